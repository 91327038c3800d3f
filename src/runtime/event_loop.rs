use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library::TrackId;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::tasks::{self, WorkerMsg};
use crate::ui;
use crate::webdav::WebDavClient;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last-known playing track as emitted to MPRIS.
    pub last_mpris_track: Option<TrackId>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            pending_gg: false,
            last_mpris_track: None,
            last_mpris_playback: app.playback,
        }
    }
}

/// What the MPRIS `Play` command does in the current state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum PlayEffect {
    Resume,
    Start,
    Ignore,
}

/// `Play` resumes when paused and starts from the selection when stopped;
/// while already playing it has no effect.
pub(super) fn play_effect(playback: PlaybackState, has_tracks: bool) -> PlayEffect {
    match playback {
        PlaybackState::Paused => PlayEffect::Resume,
        PlaybackState::Stopped if has_tracks => PlayEffect::Start,
        PlaybackState::Stopped | PlaybackState::Playing => PlayEffect::Ignore,
    }
}

/// Start fetching the folder the app currently points at: bump the
/// generation, trip stale workers, kick off the listing thread.
pub fn start_fetch(
    app: &mut App,
    client: &WebDavClient,
    settings: &config::Settings,
    worker_tx: &mpsc::Sender<WorkerMsg>,
) {
    let (generation, _cancel) = app.begin_fetch();
    spawn_fetch(app, client, settings, worker_tx, generation);
}

fn spawn_fetch(
    app: &App,
    client: &WebDavClient,
    settings: &config::Settings,
    worker_tx: &mpsc::Sender<WorkerMsg>,
    generation: u64,
) {
    tasks::spawn_listing_fetch(
        client.clone(),
        app.current_folder().clone(),
        settings.library.extensions.clone(),
        generation,
        worker_tx.clone(),
    );
}

/// Main terminal event loop: handles input, UI drawing, background worker
/// results and sync with the audio thread and MPRIS. Returns `Ok(())` when
/// shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    client: &WebDavClient,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    worker_tx: &mpsc::Sender<WorkerMsg>,
    worker_rx: &mpsc::Receiver<WorkerMsg>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Apply background results first so the draw below already sees them.
        while let Ok(msg) = worker_rx.try_recv() {
            handle_worker_msg(msg, app, audio_player, client, worker_tx);
        }

        // Sync playback state from the audio thread and mirror elapsed time
        // into the MPRIS Position property.
        app.sync_playback();
        let playing_track = match app.playback_handle.as_ref() {
            Some(handle) => match handle.lock() {
                Ok(info) => {
                    mpris.set_position_micros(info.elapsed.as_micros() as i64);
                    info.track
                }
                Err(_) => None,
            },
            None => None,
        };

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        if playing_track != state.last_mpris_track || app.playback != state.last_mpris_playback {
            update_mpris(mpris, app);
            state.last_mpris_track = playing_track;
            state.last_mpris_playback = app.playback;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, mpris)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(
                    key,
                    settings,
                    app,
                    audio_player,
                    client,
                    mpris,
                    control_tx,
                    worker_tx,
                    state,
                )? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_worker_msg(
    msg: WorkerMsg,
    app: &mut App,
    audio_player: &AudioPlayer,
    client: &WebDavClient,
    worker_tx: &mpsc::Sender<WorkerMsg>,
) {
    match msg {
        WorkerMsg::Listing {
            generation,
            folder,
            result,
        } => match result {
            Ok(listing) => {
                if app.apply_listing(generation, listing.folders, listing.tracks)
                    && app.has_tracks()
                {
                    // A track view replaces the sequencer's list; a folder
                    // view leaves whatever is playing untouched.
                    let _ = audio_player.send(AudioCmd::SetTracks(app.tracks.clone()));
                    let cancel = app
                        .cancel_token()
                        .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
                    tasks::spawn_enrichment(client, &app.tracks, generation, cancel, worker_tx);
                }
            }
            Err(e) => {
                app.apply_listing_error(generation, format!("could not load {folder}: {e}"));
            }
        },
        WorkerMsg::Tags { generation, update } => {
            app.apply_tag_update(generation, update);
        }
    }
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => match play_effect(app.playback, app.has_tracks()) {
            PlayEffect::Resume => {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Playing;
                update_mpris(mpris, app);
            }
            PlayEffect::Start => {
                let _ = audio_player.send(AudioCmd::Play(app.selected));
                app.playback = PlaybackState::Playing;
                update_mpris(mpris, app);
            }
            PlayEffect::Ignore => {}
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Paused;
                update_mpris(mpris, app);
            }
        }
        ControlCmd::PlayPause => {
            match app.playback {
                PlaybackState::Stopped => {
                    if app.has_tracks() {
                        let _ = audio_player.send(AudioCmd::Play(app.selected));
                        app.playback = PlaybackState::Playing;
                    }
                }
                PlaybackState::Playing => {
                    let _ = audio_player.send(AudioCmd::TogglePause);
                    app.playback = PlaybackState::Paused;
                }
                PlaybackState::Paused => {
                    let _ = audio_player.send(AudioCmd::TogglePause);
                    app.playback = PlaybackState::Playing;
                }
            }
            update_mpris(mpris, app);
        }
        ControlCmd::Stop => {
            let _ = audio_player.send(AudioCmd::Stop);
            app.playback = PlaybackState::Stopped;
            update_mpris(mpris, app);
        }
        ControlCmd::Next => {
            let _ = audio_player.send(AudioCmd::Next);
            update_mpris(mpris, app);
        }
        ControlCmd::Prev => {
            let _ = audio_player.send(AudioCmd::Prev);
            update_mpris(mpris, app);
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    client: &WebDavClient,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    worker_tx: &mpsc::Sender<WorkerMsg>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.selected = 0;
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            let count = app.entry_count();
            if count > 0 {
                app.selected = count - 1;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if app.is_browsing_folders() {
                if let Some(folder) = app.folders.get(app.selected).cloned() {
                    let (generation, _cancel) = app.enter_folder(folder);
                    spawn_fetch(app, client, settings, worker_tx, generation);
                }
            } else if app.has_tracks() {
                let _ = audio_player.send(AudioCmd::Play(app.selected));
                app.playback = PlaybackState::Playing;
                update_mpris(mpris, app);
            }
        }
        KeyCode::Backspace | KeyCode::Char('u') => {
            state.pending_gg = false;
            if let Some((generation, _cancel)) = app.go_up() {
                spawn_fetch(app, client, settings, worker_tx, generation);
            }
        }
        KeyCode::Char('R') => {
            state.pending_gg = false;
            start_fetch(app, client, settings, worker_tx);
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            app.cycle_loop_mode();
            let _ = audio_player.send(AudioCmd::SetLoopMode(app.loop_mode));
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            let secs = settings.controls.seek_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            let secs = settings.controls.seek_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(-secs));
        }
        KeyCode::Char('x') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    Ok(false)
}
