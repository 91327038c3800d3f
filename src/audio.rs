//! Playback sequencer: a dedicated audio thread driven by commands.

mod player;
mod queue;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, LoopMode, PlaybackHandle, PlaybackInfo};

#[cfg(test)]
mod tests;
