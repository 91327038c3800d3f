//! Audio-related small types and handles.
//!
//! This module defines common enums and type aliases used by the
//! audio subsystem (looping mode, commands, playback info and handles).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::{Track, TrackId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopMode {
    /// Stop at the end of the track list.
    NoLoop,
    /// Wrap around to the start of the track list.
    LoopAll,
    /// Repeat the current track when it ends.
    LoopOne,
}

impl Default for LoopMode {
    fn default() -> Self {
        Self::NoLoop
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the sequencer's track list (a new listing was opened).
    SetTracks(Vec<Track>),
    /// Start playing the track at the given index; the rest of the list
    /// becomes the queue.
    Play(usize),
    /// Toggle pause/resume.
    TogglePause,
    /// Skip to the next track. No-op at the end unless looping.
    Next,
    /// Go to the previous track. No-op at the start unless looping.
    Prev,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Set the loop mode used at the list boundaries.
    SetLoopMode(LoopMode),
    /// Stop playback immediately.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI and MPRIS.
pub struct PlaybackInfo {
    /// Currently playing index into the sequencer's track list (if any).
    pub index: Option<usize>,
    /// Stable id of the playing track, resilient to list swaps.
    pub track: Option<TrackId>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total duration, once resolved from the fetched bytes.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Last stream/decode failure, for the status line.
    pub error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            track: None,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            error: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
