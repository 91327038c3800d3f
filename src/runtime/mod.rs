use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer, LoopMode};
use crate::config;
use crate::library::Folder;
use crate::mpris::ControlCmd;
use crate::webdav::WebDavClient;

mod event_loop;
mod mpris_sync;
mod settings;
mod tasks;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings()?;

    let client = WebDavClient::new(&settings.server)?;
    let root = Folder {
        name: root_name(client.base_url()),
        url: client.base_url().clone(),
    };

    let loop_mode = match settings.playback.loop_mode {
        config::LoopModeSetting::NoLoop => LoopMode::NoLoop,
        config::LoopModeSetting::LoopAll => LoopMode::LoopAll,
        config::LoopModeSetting::LoopOne => LoopMode::LoopOne,
    };

    let audio_player = AudioPlayer::new(client.clone());
    let _ = audio_player.send(AudioCmd::SetLoopMode(loop_mode));

    let mut app = App::new(root, loop_mode);
    app.set_playback_handle(audio_player.playback_handle());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    let (worker_tx, worker_rx) = mpsc::channel::<tasks::WorkerMsg>();
    event_loop::start_fetch(&mut app, &client, &settings, &worker_tx);

    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = {
        let mut state = event_loop::EventLoopState::new(&app);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &client,
            &mpris,
            &control_tx,
            &control_rx,
            &worker_tx,
            &worker_rx,
            &mut state,
        )
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

/// Display name for the configured root collection: its last path segment.
fn root_name(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.rev().find(|s| !s.is_empty()))
        .map(|s| {
            urlencoding::decode(s)
                .map(|c| c.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .unwrap_or_else(|| "/".to_string())
}
