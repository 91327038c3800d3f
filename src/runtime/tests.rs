use crate::app::PlaybackState;

use super::event_loop::{PlayEffect, play_effect};

#[test]
fn mpris_play_is_a_no_op_while_already_playing() {
    assert_eq!(play_effect(PlaybackState::Playing, true), PlayEffect::Ignore);
    assert_eq!(play_effect(PlaybackState::Playing, false), PlayEffect::Ignore);
}

#[test]
fn mpris_play_resumes_when_paused() {
    assert_eq!(play_effect(PlaybackState::Paused, true), PlayEffect::Resume);
    assert_eq!(play_effect(PlaybackState::Paused, false), PlayEffect::Resume);
}

#[test]
fn mpris_play_starts_from_selection_when_stopped() {
    assert_eq!(play_effect(PlaybackState::Stopped, true), PlayEffect::Start);
    assert_eq!(play_effect(PlaybackState::Stopped, false), PlayEffect::Ignore);
}
