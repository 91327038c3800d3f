//! Application model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds the breadcrumb trail, the current listing,
//! selection and playback related flags used by the UI and runtime.
//! All mutation happens on the event-loop thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::audio::{LoopMode, PlaybackHandle};
use crate::library::{Folder, TagUpdate, Track};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// The main application model.
pub struct App {
    /// Breadcrumb trail; the last entry is the folder being shown.
    /// Never empty: index 0 is the configured root.
    pub crumbs: Vec<Folder>,

    pub folders: Vec<Folder>,
    pub tracks: Vec<Track>,
    pub selected: usize,

    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    pub loop_mode: LoopMode,

    /// Bumped on every navigation; results tagged with an older value
    /// are dropped.
    generation: u64,
    /// Cancel token observed by the current listing's tag-probe workers.
    cancel: Option<Arc<AtomicBool>>,

    pub loading: bool,
    pub status: Option<String>,
}

impl App {
    /// Create a new `App` rooted at the configured collection.
    pub fn new(root: Folder, loop_mode: LoopMode) -> Self {
        Self {
            crumbs: vec![root],
            folders: Vec::new(),
            tracks: Vec::new(),
            selected: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            loop_mode,
            generation: 0,
            cancel: None,
            loading: false,
            status: None,
        }
    }

    /// The folder whose listing is (being) shown.
    pub fn current_folder(&self) -> &Folder {
        self.crumbs.last().expect("crumbs never empty")
    }

    pub fn at_root(&self) -> bool {
        self.crumbs.len() == 1
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The cancel token for the current listing's background workers.
    pub fn cancel_token(&self) -> Option<Arc<AtomicBool>> {
        self.cancel.clone()
    }

    /// Start a fetch of the current folder: invalidates everything in
    /// flight and returns the tag for the new fetch plus the cancel token
    /// its enrichment workers must observe.
    pub fn begin_fetch(&mut self) -> (u64, Arc<AtomicBool>) {
        if let Some(old) = self.cancel.take() {
            old.store(true, Ordering::Relaxed);
        }
        self.generation += 1;
        self.loading = true;
        self.status = None;

        let token = Arc::new(AtomicBool::new(false));
        self.cancel = Some(token.clone());
        (self.generation, token)
    }

    /// Descend into `folder` and start fetching it.
    pub fn enter_folder(&mut self, folder: Folder) -> (u64, Arc<AtomicBool>) {
        self.crumbs.push(folder);
        self.selected = 0;
        self.begin_fetch()
    }

    /// Pop back to the parent folder. Returns `None` at the root.
    pub fn go_up(&mut self) -> Option<(u64, Arc<AtomicBool>)> {
        if self.at_root() {
            return None;
        }
        self.crumbs.pop();
        self.selected = 0;
        Some(self.begin_fetch())
    }

    /// Install a fetched listing. Results from a superseded fetch are
    /// dropped. Returns whether the view changed.
    pub fn apply_listing(&mut self, generation: u64, folders: Vec<Folder>, tracks: Vec<Track>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.folders = folders;
        self.tracks = tracks;
        self.selected = 0;
        self.loading = false;
        true
    }

    /// Record a failed fetch: the view degrades to an empty list with a
    /// status line. Stale failures are dropped like stale listings.
    pub fn apply_listing_error(&mut self, generation: u64, message: String) -> bool {
        if generation != self.generation {
            return false;
        }
        self.folders.clear();
        self.tracks.clear();
        self.selected = 0;
        self.loading = false;
        self.status = Some(message);
        true
    }

    /// Apply one tag-probe result to the track it belongs to, matched by
    /// id. Results for tracks no longer shown fall through silently.
    pub fn apply_tag_update(&mut self, generation: u64, update: TagUpdate) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.tracks.iter_mut().find(|t| t.id == update.track) {
            Some(track) => {
                update.apply_to(track);
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Cycle `loop_mode` through `NoLoop -> LoopAll -> LoopOne`.
    pub fn cycle_loop_mode(&mut self) {
        self.loop_mode = match self.loop_mode {
            LoopMode::NoLoop => LoopMode::LoopAll,
            LoopMode::LoopAll => LoopMode::LoopOne,
            LoopMode::LoopOne => LoopMode::NoLoop,
        };
    }

    /// Derive `playback` from the audio thread's shared info and surface
    /// any stream failure it recorded.
    pub fn sync_playback(&mut self) {
        let Some(ref handle) = self.playback_handle else {
            self.playback = PlaybackState::Stopped;
            return;
        };
        let Ok(info) = handle.lock() else {
            return;
        };
        self.playback = match (info.index, info.playing) {
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
            (None, _) => PlaybackState::Stopped,
        };
        if let Some(ref e) = info.error {
            self.status = Some(e.clone());
        }
    }

    /// True when the current listing shows sub-folders (the two never mix).
    pub fn is_browsing_folders(&self) -> bool {
        !self.folders.is_empty()
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Number of selectable rows in the current view.
    pub fn entry_count(&self) -> usize {
        if self.is_browsing_folders() {
            self.folders.len()
        } else {
            self.tracks.len()
        }
    }

    /// Move selection to the next row, wrapping.
    pub fn next(&mut self) {
        let count = self.entry_count();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    /// Move selection to the previous row, wrapping.
    pub fn prev(&mut self) {
        let count = self.entry_count();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }
}
