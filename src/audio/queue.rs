//! Pure index stepping for the play queue.
//!
//! The queue is never stored: it is the suffix of the current track list
//! from the playing index onward. These helpers decide where manual
//! next/prev and natural track end land.

use super::types::LoopMode;

/// Where auto-advance goes when the current track drains.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum AutoStep {
    Play(usize),
    Stop,
}

/// Manual next. At the end of the list only `LoopAll` wraps; repeat-one is
/// not honored for explicit skips.
pub(crate) fn advance(index: Option<usize>, len: usize, loop_mode: LoopMode) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(i) = index else {
        return Some(0);
    };
    if i + 1 < len {
        Some(i + 1)
    } else if loop_mode == LoopMode::LoopAll {
        Some(0)
    } else {
        None
    }
}

/// Manual previous. Mirror of [`advance`]; never goes negative.
pub(crate) fn retreat(index: Option<usize>, len: usize, loop_mode: LoopMode) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(i) = index else {
        return None;
    };
    if i > 0 {
        Some(i - 1)
    } else if loop_mode == LoopMode::LoopAll {
        Some(len - 1)
    } else {
        None
    }
}

/// Natural end of the current track: repeat, wrap, continue or stop.
pub(crate) fn auto_advance(index: Option<usize>, len: usize, loop_mode: LoopMode) -> AutoStep {
    let Some(i) = index else {
        return AutoStep::Stop;
    };
    if len == 0 {
        return AutoStep::Stop;
    }

    match loop_mode {
        LoopMode::LoopOne => AutoStep::Play(i.min(len - 1)),
        LoopMode::LoopAll => AutoStep::Play((i + 1) % len),
        LoopMode::NoLoop => {
            if i + 1 < len {
                AutoStep::Play(i + 1)
            } else {
                AutoStep::Stop
            }
        }
    }
}
