use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use lofty::{AudioFile, Probe};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::library::{Track, TrackId};
use crate::webdav::WebDavClient;

use super::queue::{AutoStep, advance, auto_advance, retreat};
use super::sink::create_sink_at;
use super::types::{AudioCmd, LoopMode, PlaybackHandle};

/// Record a stream failure for the status line without touching the rest of
/// the playback state: whatever was playing before keeps playing.
pub(super) fn report_stream_error(playback_info: &PlaybackHandle, message: String) {
    if let Ok(mut info) = playback_info.lock() {
        info.error = Some(message);
    }
}

/// Seek destination: the current position shifted by `delta_secs`, clamped
/// to the start of the track and, once resolved, to its duration.
pub(super) fn seek_target(
    elapsed: Duration,
    delta_secs: i32,
    duration: Option<Duration>,
) -> Duration {
    let current = elapsed.as_secs() as i64;
    let mut target = (current + delta_secs as i64).max(0) as u64;
    if let Some(total) = duration {
        target = target.min(total.as_secs());
    }
    Duration::from_secs(target)
}

/// Total duration of the fetched resource, when the container reports one.
/// Zero (unknown/unbounded) is treated as unresolved.
fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}

pub(super) fn spawn_audio_thread(
    client: WebDavClient,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut tracks: Vec<Track> = Vec::new();
        let mut index: Option<usize> = None;
        let mut paused = true;
        let mut sink: Option<Sink> = None;

        // Bytes of the current track, kept so seeks don't refetch.
        let mut current: Option<(TrackId, Arc<[u8]>)> = None;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let mut loop_mode: LoopMode = LoopMode::default();

        // Spawn a ticker thread to update playback_info.elapsed every half second.
        let info_for_ticker_clone = playback_info.clone();
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(500));
            if let Ok(mut info) = info_for_ticker_clone.lock() {
                if info.playing {
                    info.elapsed += Duration::from_millis(500);
                }
            }
        });

        fn do_play(
            i: usize,
            stream: &OutputStream,
            client: &WebDavClient,
            tracks: &[Track],
            sink: &mut Option<Sink>,
            index: &mut Option<usize>,
            paused: &mut bool,
            current: &mut Option<(TrackId, Arc<[u8]>)>,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            playback_info: &PlaybackHandle,
        ) {
            let track = &tracks[i];

            let bytes: Arc<[u8]> = match current {
                Some((id, bytes)) if *id == track.id => bytes.clone(),
                _ => match client.fetch(&track.url) {
                    Ok(b) => {
                        let b: Arc<[u8]> = Arc::from(b);
                        *current = Some((track.id, b.clone()));
                        b
                    }
                    Err(e) => {
                        report_stream_error(
                            playback_info,
                            format!("cannot stream {}: {e}", track.filename),
                        );
                        return;
                    }
                },
            };

            // Build the replacement sink before touching the old one, so a
            // decode failure leaves whatever was playing untouched.
            let new_sink = match create_sink_at(stream, bytes.clone(), Duration::ZERO) {
                Ok(s) => s,
                Err(e) => {
                    report_stream_error(
                        playback_info,
                        format!("cannot decode {}: {e}", track.filename),
                    );
                    return;
                }
            };
            if let Some(old_sink) = sink.as_ref() {
                old_sink.stop();
            }
            new_sink.play();

            *sink = Some(new_sink);
            *index = Some(i);
            *paused = false;
            *started_at = Some(Instant::now());
            *accumulated = Duration::ZERO;

            // Resolved from the full buffer; falls back to whatever the tag
            // probe found earlier.
            let duration = probe_duration(&bytes).or(track.duration);

            // Playing is reported before the mixer produced a sample.
            if let Ok(mut info) = playback_info.lock() {
                info.index = Some(i);
                info.track = Some(track.id);
                info.elapsed = Duration::ZERO;
                info.duration = duration;
                info.playing = true;
                info.error = None;
            }
        }

        fn do_stop(
            sink: &mut Option<Sink>,
            index: &mut Option<usize>,
            paused: &mut bool,
            current: &mut Option<(TrackId, Arc<[u8]>)>,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            playback_info: &PlaybackHandle,
        ) {
            if let Some(s) = sink.as_ref() {
                s.stop();
            }
            *sink = None;
            *index = None;
            *paused = true;
            *current = None;
            *started_at = None;
            *accumulated = Duration::ZERO;
            if let Ok(mut info) = playback_info.lock() {
                info.index = None;
                info.track = None;
                info.elapsed = Duration::ZERO;
                info.duration = None;
                info.playing = false;
            }
        }

        fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            sink.set_volume(1.0);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(1.0 - t);
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::SetTracks(new_tracks) => {
                        tracks = new_tracks;
                        // Keep whatever is playing, but re-derive its index by id;
                        // a track missing from the new list plays out without a queue.
                        let playing_id = current.as_ref().map(|(id, _)| *id);
                        index = playing_id
                            .filter(|_| sink.is_some())
                            .and_then(|id| tracks.iter().position(|t| t.id == id));
                        if let Ok(mut info) = playback_info.lock() {
                            info.index = index;
                        }
                    }

                    AudioCmd::Play(i) => {
                        if i < tracks.len() {
                            do_play(
                                i,
                                &stream,
                                &client,
                                &tracks,
                                &mut sink,
                                &mut index,
                                &mut paused,
                                &mut current,
                                &mut started_at,
                                &mut accumulated,
                                &playback_info,
                            );
                        }
                    }

                    AudioCmd::TogglePause => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                            } else {
                                s.pause();
                            }
                            if paused {
                                // unpausing
                                started_at = Some(Instant::now());
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = true;
                                }
                            } else {
                                // pausing
                                if let Some(st) = started_at {
                                    accumulated += Instant::now() - st;
                                }
                                started_at = None;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = false;
                                }
                            }
                            paused = !paused;
                        }
                    }

                    AudioCmd::Next => {
                        if let Some(next) = advance(index, tracks.len(), loop_mode) {
                            do_play(
                                next,
                                &stream,
                                &client,
                                &tracks,
                                &mut sink,
                                &mut index,
                                &mut paused,
                                &mut current,
                                &mut started_at,
                                &mut accumulated,
                                &playback_info,
                            );
                        }
                    }

                    AudioCmd::Prev => {
                        if let Some(prev) = retreat(index, tracks.len(), loop_mode) {
                            do_play(
                                prev,
                                &stream,
                                &client,
                                &tracks,
                                &mut sink,
                                &mut index,
                                &mut paused,
                                &mut current,
                                &mut started_at,
                                &mut accumulated,
                                &playback_info,
                            );
                        }
                    }

                    AudioCmd::SeekBy(secs) => {
                        // Scrubbing: rebuild the sink over the cached bytes and
                        // skip into the stream.
                        if index.is_none() || sink.is_none() {
                            continue;
                        }
                        let Some((_, bytes)) = current.clone() else {
                            continue;
                        };

                        let elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        let duration = playback_info.lock().ok().and_then(|info| info.duration);
                        let new_elapsed = seek_target(elapsed, secs, duration);

                        // Build the replacement before touching the old sink;
                        // a failed rebuild leaves playback where it was.
                        match create_sink_at(&stream, bytes, new_elapsed) {
                            Ok(new_sink) => {
                                if let Some(s) = sink.as_ref() {
                                    s.stop();
                                }
                                if paused {
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                sink = Some(new_sink);
                                accumulated = new_elapsed;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = new_elapsed;
                                }
                            }
                            Err(e) => {
                                let what = index
                                    .and_then(|i| tracks.get(i))
                                    .map(|t| t.filename.clone())
                                    .unwrap_or_default();
                                report_stream_error(
                                    &playback_info,
                                    format!("cannot seek in {what}: {e}"),
                                );
                            }
                        }
                    }

                    AudioCmd::SetLoopMode(m) => {
                        loop_mode = m;
                    }

                    AudioCmd::Stop => {
                        do_stop(
                            &mut sink,
                            &mut index,
                            &mut paused,
                            &mut current,
                            &mut started_at,
                            &mut accumulated,
                            &playback_info,
                        );
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, fade_out_ms);
                            s.stop();
                        }
                        // Update shared state so UI/MPRIS don't keep showing Playing.
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // periodic check for natural end of the current track
                    let drained = !paused && sink.as_ref().is_some_and(|s| s.empty());
                    if drained {
                        match auto_advance(index, tracks.len(), loop_mode) {
                            AutoStep::Play(i) => {
                                do_play(
                                    i,
                                    &stream,
                                    &client,
                                    &tracks,
                                    &mut sink,
                                    &mut index,
                                    &mut paused,
                                    &mut current,
                                    &mut started_at,
                                    &mut accumulated,
                                    &playback_info,
                                );
                            }
                            AutoStep::Stop => {
                                do_stop(
                                    &mut sink,
                                    &mut index,
                                    &mut paused,
                                    &mut current,
                                    &mut started_at,
                                    &mut accumulated,
                                    &playback_info,
                                );
                            }
                        }
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
