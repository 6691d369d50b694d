//! System fallback TTS engine
//!
//! Fire-and-forget vocalization through a system speech command; no
//! persisted artifact.

use super::TtsEngine;
use crate::error::{YumiError, YumiResult};
use async_trait::async_trait;
use std::process::Command;
use tracing::debug;

#[derive(Debug)]
pub struct SystemEngine;

impl Default for SystemEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TtsEngine for SystemEngine {
    async fn speak(&self, text: &str) -> YumiResult<()> {
        debug!("System speaking: {}", text);

        // Try spd-say (speech-dispatcher) or espeak-ng
        if Command::new("spd-say").arg(text).spawn().is_ok() {
            return Ok(());
        }

        if Command::new("espeak-ng").arg(text).spawn().is_ok() {
            return Ok(());
        }

        Err(YumiError::Speech(
            "no system TTS command found (tried spd-say, espeak-ng)".into(),
        ))
    }

    fn name(&self) -> &str {
        "system"
    }
}
