//! Vosk-backed transcription

use super::{join_segments, Transcriber, WINDOW_SIZE};
use crate::capture::AudioBuffer;
use crate::config::Config;
use crate::error::{YumiError, YumiResult};
use tracing::{debug, info};
use vosk::{DecodingState, Model, Recognizer};

/// Offline transcriber holding a loaded Vosk model.
///
/// A fresh recognizer is created per buffer so one turn's decoder state can
/// never leak into the next.
pub struct VoskTranscriber {
    model: Model,
}

impl VoskTranscriber {
    pub fn new(config: &Config) -> YumiResult<Self> {
        let model_path = std::path::PathBuf::from(&config.vosk_model_path);

        if !model_path.exists() {
            return Err(YumiError::Transcription(format!(
                "Vosk model not found at {}",
                model_path.display()
            )));
        }

        info!("Loading Vosk model from: {}", model_path.display());

        let model_str = model_path.to_str().ok_or_else(|| {
            YumiError::Transcription(format!(
                "Vosk model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;

        let model = Model::new(model_str)
            .ok_or_else(|| YumiError::Transcription("Failed to load Vosk model".into()))?;

        Ok(Self { model })
    }
}

impl Transcriber for VoskTranscriber {
    fn transcribe(&mut self, buffer: &AudioBuffer) -> YumiResult<String> {
        if buffer.channels() != 1 {
            return Err(YumiError::Transcription(format!(
                "decoder expects mono audio, got {} channels",
                buffer.channels()
            )));
        }

        let mut recognizer = Recognizer::new(&self.model, buffer.sample_rate() as f32)
            .ok_or_else(|| YumiError::Transcription("Failed to create Vosk recognizer".into()))?;

        let samples: Vec<i16> = buffer.samples().collect();
        let mut segments: Vec<String> = Vec::new();

        for window in samples.chunks(WINDOW_SIZE) {
            match recognizer.accept_waveform(window) {
                DecodingState::Finalized => {
                    if let Some(single) = recognizer.result().single() {
                        segments.push(single.text.to_string());
                    }
                }
                DecodingState::Running => {
                    debug!("Partial: {}", recognizer.partial_result().partial);
                }
                DecodingState::Failed => {
                    return Err(YumiError::Transcription(
                        "decoder rejected an audio window".into(),
                    ));
                }
            }
        }

        // Final flush for whatever the last window left pending.
        if let Some(single) = recognizer.final_result().single() {
            segments.push(single.text.to_string());
        }

        Ok(join_segments(&segments))
    }
}
