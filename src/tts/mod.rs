//! TTS (Text-to-Speech) Module
//!
//! Provides a unified interface for the two supported output modes:
//! synthesize-to-file-then-play (piper) and fire-and-forget vocalization
//! (system). A speech failure is reported, never process-fatal.

use crate::config::Config;
use crate::error::YumiResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub mod piper;
pub mod system;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync + std::fmt::Debug {
    /// Speak the given text. Returns only after playback has fully
    /// completed (or failed), so consecutive utterances never interleave.
    async fn speak(&self, text: &str) -> YumiResult<()>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Factory to create the configured TTS engine
pub fn create_engine(
    config: &Config,
    sound_engine: Arc<crate::audio::SoundEngine>,
) -> YumiResult<Arc<dyn TtsEngine>> {
    info!("🛠️ Creating TTS engine: {}", config.tts_engine);
    let engine: Arc<dyn TtsEngine> = match config.tts_engine.as_str() {
        "piper" => {
            info!("  - Using Piper TTS (Voice: {})", config.piper_voice);
            Arc::new(piper::PiperEngine::new(config, sound_engine)?)
        }
        "system" => {
            info!("  - Using System TTS");
            Arc::new(system::SystemEngine::new())
        }
        _ => {
            warn!(
                "  - Unknown engine '{}', falling back to System",
                config.tts_engine
            );
            Arc::new(system::SystemEngine::new())
        }
    };
    info!("✅ TTS engine '{}' initialized", engine.name());
    Ok(engine)
}
