//! Embedded-tag probing for streamed tracks.
//!
//! Tags live at the head of the common container formats, so a ranged fetch
//! of the first [`PROBE_BYTES`] of the resource is enough for lofty to read
//! title/artist/album and an estimated duration. A failed probe is silently
//! dropped; the track keeps its filename-derived title.

use std::io::Cursor;
use std::time::Duration;

use lofty::{AudioFile, ItemKey, Probe, TaggedFileExt};

use super::model::{Track, TrackId};

/// How much of the resource head to fetch for a tag probe.
pub const PROBE_BYTES: u64 = 512 * 1024;

/// Result of one tag probe, keyed by the track's stable id.
#[derive(Debug, Clone)]
pub struct TagUpdate {
    pub track: TrackId,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl TagUpdate {
    /// Write the probed fields into `track`, leaving unset fields alone.
    pub fn apply_to(&self, track: &mut Track) {
        debug_assert_eq!(self.track, track.id);
        if let Some(title) = &self.title {
            track.title = title.clone();
        }
        if let Some(artist) = &self.artist {
            track.artist = Some(artist.clone());
        }
        if let Some(album) = &self.album {
            track.album = Some(album.clone());
        }
        if track.duration.is_none() {
            track.duration = self.duration;
        }
    }
}

/// Probe `bytes` (the head of an audio resource) for embedded tags.
///
/// Returns `None` when the container cannot be identified or carries nothing
/// usable.
pub fn read_tags(id: TrackId, bytes: &[u8]) -> Option<TagUpdate> {
    let cursor = Cursor::new(bytes);
    let tagged = Probe::new(cursor).guess_file_type().ok()?.read().ok()?;

    // Durations estimated from a truncated head can be zero; treat that as unknown.
    let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

    let mut update = TagUpdate {
        track: id,
        title: None,
        artist: None,
        album: None,
        duration,
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
            if !v.trim().is_empty() {
                update.title = Some(v.trim().to_string());
            }
        }
        if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
            if !v.trim().is_empty() {
                update.artist = Some(v.trim().to_string());
            }
        }
        if let Some(v) = tag.get_string(&ItemKey::AlbumTitle) {
            if !v.trim().is_empty() {
                update.album = Some(v.trim().to_string());
            }
        }
    }

    if update.title.is_none()
        && update.artist.is_none()
        && update.album.is_none()
        && update.duration.is_none()
    {
        return None;
    }

    Some(update)
}
