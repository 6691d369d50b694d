//! Piper TTS backend calling a local binary
//!
//! Synthesizes the reply to the configured WAV path, then performs a
//! blocking play-to-completion through the sound engine. The WAV is a
//! transient artifact overwritten on every turn.

use super::TtsEngine;
use crate::audio::SoundEngine;
use crate::config::Config;
use crate::error::{YumiError, YumiResult};
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct PiperEngine {
    model_path: String,
    output_path: PathBuf,
    sound_engine: Arc<SoundEngine>,
}

impl PiperEngine {
    pub fn new(config: &Config, sound_engine: Arc<SoundEngine>) -> YumiResult<Self> {
        let data_dir = dirs::data_dir().unwrap_or_default().join("yumi/voices");
        let model_filename = format!("{}.onnx", config.piper_voice);
        let model_path = data_dir.join(model_filename);

        if !model_path.exists() {
            warn!("⚠️ Piper model not found at {}", model_path.display());
        }

        Ok(Self {
            model_path: model_path.to_string_lossy().to_string(),
            output_path: PathBuf::from(&config.reply_audio_path),
            sound_engine,
        })
    }
}

#[async_trait]
impl TtsEngine for PiperEngine {
    async fn speak(&self, text: &str) -> YumiResult<()> {
        info!("📢 Piper speaking: '{}'", text);

        if self.model_path.is_empty() || !std::path::Path::new(&self.model_path).exists() {
            return Err(YumiError::Speech(format!(
                "Piper model file missing: {}",
                self.model_path
            )));
        }

        // Clone values for move into blocking task
        let model_path = self.model_path.clone();
        let wav_path = self.output_path.clone();
        let text_owned = text.to_string();
        let sound_engine = Arc::clone(&self.sound_engine);

        // Move blocking subprocess work to dedicated thread pool
        tokio::task::spawn_blocking(move || -> YumiResult<()> {
            let mut child = Command::new("piper-tts")
                .arg("-m")
                .arg(&model_path)
                .arg("-f")
                .arg(&wav_path)
                .stdin(Stdio::piped())
                .spawn()
                .map_err(|e| YumiError::Speech(format!("failed to spawn piper-tts: {e}")))?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(text_owned.as_bytes())
                    .map_err(|e| YumiError::Speech(format!("failed to feed piper-tts: {e}")))?;
                stdin
                    .flush()
                    .map_err(|e| YumiError::Speech(format!("failed to feed piper-tts: {e}")))?;
            }

            let status = child
                .wait()
                .map_err(|e| YumiError::Speech(format!("piper-tts did not exit: {e}")))?;
            if !status.success() {
                return Err(YumiError::Speech(format!(
                    "piper-tts failed with status {status}"
                )));
            }

            if !wav_path.exists() {
                return Err(YumiError::Speech("piper output file not created".into()));
            }

            // Blocks until the reply has fully played out.
            sound_engine
                .play_file_sync(&wav_path)
                .map_err(|e| YumiError::Speech(e.to_string()))?;

            Ok(())
        })
        .await
        .map_err(|e| YumiError::Speech(format!("speech task failed: {e}")))??;

        Ok(())
    }

    fn name(&self) -> &str {
        "piper"
    }
}
