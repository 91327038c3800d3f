use base64::{Engine as _, engine::general_purpose};
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode, Url};
use thiserror::Error;

use crate::config::ServerSettings;
use crate::library::Listing;

use super::parse::parse_listing;

#[derive(Debug, Error)]
pub enum WebDavError {
    /// Transport-level failure (DNS, TLS, connection, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(StatusCode),

    /// A configured URL does not parse.
    #[error("invalid URL {0}")]
    BadUrl(String),
}

/// Blocking client for one WebDAV share.
///
/// Cheap to clone; worker threads each hold their own copy.
#[derive(Debug, Clone)]
pub struct WebDavClient {
    http: Client,
    base: Url,
    media_base: Url,
    auth: String,
}

impl WebDavClient {
    pub fn new(server: &ServerSettings) -> Result<Self, WebDavError> {
        let base = Url::parse(server.url.trim())
            .map_err(|e| WebDavError::BadUrl(format!("{}: {e}", server.url)))?;
        let media_base = derive_media_base(&base, server.media_url.trim())?;

        let login = format!("{}:{}", server.username, server.password);
        let auth = format!(
            "Basic {}",
            general_purpose::STANDARD.encode(login.as_bytes())
        );

        Ok(Self {
            http: Client::new(),
            base,
            media_base,
            auth,
        })
    }

    /// The configured collection URL the browser starts at.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// PROPFIND one collection and parse its children.
    ///
    /// Transport and HTTP-status failures are surfaced; a body whose shape
    /// yields no hrefs parses to an empty listing.
    pub fn list(&self, folder: &Url, extensions: &[String]) -> Result<Listing, WebDavError> {
        let method = Method::from_bytes(b"PROPFIND").expect("static method name");
        let response = self
            .http
            .request(method, folder.clone())
            .header("Content-Type", "application/xml")
            .header("Depth", "1")
            .header("Authorization", &self.auth)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebDavError::Status(status));
        }

        let body = response.text()?;
        let mut base = folder.path().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(parse_listing(&base, &body, extensions, &self.media_base))
    }

    /// GET the whole resource, for playback.
    pub fn fetch(&self, url: &Url) -> Result<Vec<u8>, WebDavError> {
        let response = self
            .http
            .get(url.clone())
            .header("Authorization", &self.auth)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebDavError::Status(status));
        }
        Ok(response.bytes()?.to_vec())
    }

    /// GET at most the first `limit` bytes of the resource, for tag probing.
    pub fn fetch_head(&self, url: &Url, limit: u64) -> Result<Vec<u8>, WebDavError> {
        let response = self
            .http
            .get(url.clone())
            .header("Authorization", &self.auth)
            .header("Range", format!("bytes=0-{}", limit.saturating_sub(1)))
            .send()?;

        let status = response.status();
        // A plain 200 means the server ignored the range and sent everything.
        if !status.is_success() {
            return Err(WebDavError::Status(status));
        }

        let bytes = response.bytes()?;
        let cap = usize::try_from(limit).unwrap_or(usize::MAX).min(bytes.len());
        Ok(bytes[..cap].to_vec())
    }
}

/// The origin tracks are streamed from: the server URL's own origin, unless
/// `media_url` overrides it. A host mismatch between the two is reported on
/// stderr before the TUI takes over.
pub(crate) fn derive_media_base(base: &Url, media_url: &str) -> Result<Url, WebDavError> {
    let mut origin = if media_url.is_empty() {
        base.clone()
    } else {
        let parsed = Url::parse(media_url)
            .map_err(|e| WebDavError::BadUrl(format!("{media_url}: {e}")))?;
        if parsed.host_str() != base.host_str() {
            eprintln!(
                "cirro: media host {} differs from server host {}; streaming from the former",
                parsed.host_str().unwrap_or("?"),
                base.host_str().unwrap_or("?")
            );
        }
        parsed
    };

    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    Ok(origin)
}
