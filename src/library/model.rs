use std::time::Duration;

use reqwest::Url;
use uuid::Uuid;

/// Stable identity of a track within a listing. Late-arriving tag updates
/// are matched by this id, never by position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// A sub-collection on the server. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub url: Url,
}

/// An audio file on the server.
///
/// `title` starts as the filename; `artist`, `album` and `duration` start
/// empty and are filled in place when a tag probe for this id completes.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub url: Url,
    pub filename: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    pub fn new(url: Url, filename: String) -> Self {
        Self {
            id: TrackId::new(),
            url,
            title: filename.clone(),
            filename,
            artist: None,
            album: None,
            duration: None,
        }
    }

    /// One-line list rendering: "Artist - Title" when the artist is known.
    pub fn display(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }
}

/// One parsed directory listing.
///
/// A directory is shown either as a folder of folders or a folder of tracks,
/// never mixed: when any sub-folder is present the tracks are dropped.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub folders: Vec<Folder>,
    pub tracks: Vec<Track>,
}

impl Listing {
    /// Assemble a listing, applying the folders-win display invariant.
    pub fn assemble(folders: Vec<Folder>, mut tracks: Vec<Track>) -> Self {
        if !folders.is_empty() {
            tracks.clear();
        }
        Self { folders, tracks }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.tracks.is_empty()
    }
}
