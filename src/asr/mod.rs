//! Transcription module
//!
//! Wraps the speech decoder behind a uniform buffer-to-text contract. An
//! empty transcript means "no speech recognized" and is never an error.

pub mod vosk;

pub use vosk::VoskTranscriber;

use crate::capture::AudioBuffer;
use crate::error::YumiResult;

/// Number of samples fed to the decoder per window.
pub const WINDOW_SIZE: usize = 4000;

/// Trait for transcription engines
pub trait Transcriber: Send {
    /// Decode a captured buffer into trimmed text. `Ok("")` is the valid
    /// "no speech" outcome, distinct from a decoding failure.
    fn transcribe(&mut self, buffer: &AudioBuffer) -> YumiResult<String>;
}

/// Concatenate recognized segments in capture order, dropping empties.
pub(crate) fn join_segments(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
