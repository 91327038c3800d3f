use crate::config;

/// Load settings, tolerating a missing or broken file but refusing to start
/// without a usable server URL.
pub fn load_settings() -> Result<config::Settings, String> {
    let settings = match config::Settings::load() {
        Ok(s) => s,
        Err(e) => {
            // A broken file should not hide the real problem behind a panic.
            eprintln!("cirro: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    };
    settings.validate()?;
    Ok(settings)
}
