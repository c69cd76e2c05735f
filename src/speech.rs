//! Speech capture and playback behind a capability check.
//!
//! Platform adapters implement [`SpeechCapability`]. Where no speech
//! engine exists, [`NoSpeech`] stands in: it reports itself unavailable and
//! refuses to capture, so callers can show a notice instead of failing
//! silently.

use crate::error::{Error, Result};

/// Outcome reported by an adapter after [`SpeechCapability::start_capture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Recognised speech.
    Transcript(String),
    /// Recognition failed; the string describes why.
    Error(String),
    /// Capture stopped without a result.
    Ended,
}

/// Speech-to-text and text-to-speech provided by the runtime.
pub trait SpeechCapability: Send {
    /// Returns true if capture is supported at all.
    fn is_available(&self) -> bool;

    /// Begins listening; results arrive later as [`CaptureEvent`]s.
    fn start_capture(&mut self) -> Result<()>;

    /// Stops listening, letting a pending result be delivered.
    fn stop_capture(&mut self) -> Result<()>;

    /// Stops listening and discards any pending result.
    fn abort_capture(&mut self);

    /// Reads `text` aloud, cancelling anything already playing.
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Adapter for runtimes without speech support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

impl SpeechCapability for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn start_capture(&mut self) -> Result<()> {
        Err(Error::speech_unsupported(
            "Speech recognition is not supported in this environment.",
        ))
    }

    fn stop_capture(&mut self) -> Result<()> {
        Err(Error::speech_unsupported(
            "Speech recognition is not supported in this environment.",
        ))
    }

    fn abort_capture(&mut self) {}

    fn speak(&mut self, _: &str) -> Result<()> {
        Ok(())
    }
}
