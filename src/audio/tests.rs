use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::queue::{AutoStep, advance, auto_advance, retreat};
use super::thread::{report_stream_error, seek_target};
use super::types::{LoopMode, PlaybackInfo};

#[test]
fn advance_from_nothing_starts_at_zero() {
    assert_eq!(advance(None, 3, LoopMode::NoLoop), Some(0));
    assert_eq!(advance(None, 0, LoopMode::NoLoop), None);
}

#[test]
fn advance_at_last_track_is_a_no_op_without_looping() {
    assert_eq!(advance(Some(2), 3, LoopMode::NoLoop), None);
    assert_eq!(advance(Some(2), 3, LoopMode::LoopOne), None);
}

#[test]
fn advance_wraps_when_looping_all() {
    assert_eq!(advance(Some(2), 3, LoopMode::LoopAll), Some(0));
    assert_eq!(advance(Some(0), 3, LoopMode::LoopAll), Some(1));
}

#[test]
fn retreat_at_first_track_is_a_no_op_without_looping() {
    assert_eq!(retreat(Some(0), 3, LoopMode::NoLoop), None);
    assert_eq!(retreat(None, 3, LoopMode::NoLoop), None);
}

#[test]
fn retreat_wraps_to_last_when_looping_all() {
    assert_eq!(retreat(Some(0), 3, LoopMode::LoopAll), Some(2));
    assert_eq!(retreat(Some(2), 3, LoopMode::NoLoop), Some(1));
}

#[test]
fn natural_end_stops_at_queue_boundary() {
    assert_eq!(auto_advance(Some(2), 3, LoopMode::NoLoop), AutoStep::Stop);
    assert_eq!(auto_advance(Some(0), 3, LoopMode::NoLoop), AutoStep::Play(1));
}

#[test]
fn natural_end_repeats_or_wraps_per_loop_mode() {
    assert_eq!(auto_advance(Some(1), 3, LoopMode::LoopOne), AutoStep::Play(1));
    assert_eq!(auto_advance(Some(2), 3, LoopMode::LoopAll), AutoStep::Play(0));
}

#[test]
fn natural_end_with_no_queue_stops() {
    assert_eq!(auto_advance(None, 3, LoopMode::NoLoop), AutoStep::Stop);
    assert_eq!(auto_advance(Some(0), 0, LoopMode::LoopAll), AutoStep::Stop);
}

#[test]
fn seek_target_clamps_at_track_start() {
    let total = Some(Duration::from_secs(100));
    assert_eq!(seek_target(Duration::from_secs(3), -10, total), Duration::ZERO);
    assert_eq!(seek_target(Duration::ZERO, -5, None), Duration::ZERO);
}

#[test]
fn seek_target_clamps_at_track_end() {
    let total = Some(Duration::from_secs(100));
    assert_eq!(
        seek_target(Duration::from_secs(95), 10, total),
        Duration::from_secs(100)
    );
    // duration not resolved yet: only the lower bound applies
    assert_eq!(
        seek_target(Duration::from_secs(95), 10, None),
        Duration::from_secs(105)
    );
}

#[test]
fn seek_target_moves_freely_within_bounds() {
    let total = Some(Duration::from_secs(100));
    assert_eq!(
        seek_target(Duration::from_secs(30), 5, total),
        Duration::from_secs(35)
    );
    assert_eq!(
        seek_target(Duration::from_secs(30), -5, total),
        Duration::from_secs(25)
    );
}

#[test]
fn stream_errors_keep_the_previous_playback_state() {
    let handle = Arc::new(Mutex::new(PlaybackInfo::default()));
    {
        let mut info = handle.lock().unwrap();
        info.index = Some(2);
        info.playing = true;
        info.elapsed = Duration::from_secs(42);
    }

    report_stream_error(&handle, "cannot seek in a.mp3: bad stream".to_string());

    let info = handle.lock().unwrap();
    assert_eq!(info.index, Some(2));
    assert!(info.playing);
    assert_eq!(info.elapsed, Duration::from_secs(42));
    assert_eq!(info.error.as_deref(), Some("cannot seek in a.mp3: bad stream"));
}
