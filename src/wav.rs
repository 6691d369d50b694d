//! WAV artifact writing for captured turns
//!
//! Each voice turn overwrites the configured recording path; the file is a
//! transient artifact, not durable state.

use crate::capture::AudioBuffer;
use crate::error::{YumiError, YumiResult};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Write a captured buffer to a 16-bit PCM WAV file, replacing any
/// previous recording at the same path.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> YumiResult<()> {
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: buffer.bits_per_sample(),
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| YumiError::Capture(format!("failed to create {}: {e}", path.display())))?;

    for sample in buffer.samples() {
        writer
            .write_sample(sample)
            .map_err(|e| YumiError::Capture(format!("failed to write sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| YumiError::Capture(format!("failed to finalize wav: {e}")))?;

    Ok(())
}
