//! Mock TTS Engine for Testing
//!
//! Records all spoken text for verification.

use super::AudioDeviceProbe;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use yumi::error::{YumiError, YumiResult};
use yumi::tts::TtsEngine;

/// Mock TTS engine that records spoken text
#[derive(Debug)]
pub struct MockTts {
    /// All text that was "spoken"
    spoken: Arc<Mutex<Vec<String>>>,
    /// Simulate failure on every speak
    pub should_fail: Arc<Mutex<bool>>,
    probe: Option<AudioDeviceProbe>,
}

impl MockTts {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            probe: None,
        }
    }

    pub fn with_probe(probe: AudioDeviceProbe) -> Self {
        Self {
            probe: Some(probe),
            ..Self::new()
        }
    }

    /// Handle that stays valid after the engine moves into the app.
    pub fn spoken_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.spoken)
    }
}

impl Default for MockTts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtsEngine for MockTts {
    async fn speak(&self, text: &str) -> YumiResult<()> {
        if let Some(probe) = &self.probe {
            probe.acquire("playback");
        }
        let result = if *self.should_fail.lock().unwrap() {
            Err(YumiError::Speech("mock TTS failure".to_string()))
        } else {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        };
        if let Some(probe) = &self.probe {
            probe.release();
        }
        result
    }

    fn name(&self) -> &str {
        "mock"
    }
}
