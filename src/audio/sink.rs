//! Utilities for creating `rodio` sinks from fetched track bytes.
//!
//! The whole resource is in memory by the time a sink is built, so seeking
//! is a rebuild with `skip_duration` over the same buffer.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink, Source};

/// Create a paused `Sink` over `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, DecoderError> {
    let source = Decoder::new(Cursor::new(bytes))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
