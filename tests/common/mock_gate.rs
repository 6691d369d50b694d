//! Mock capture gate for testing
//!
//! Serves scripted capture results instead of touching a real device.

use super::AudioDeviceProbe;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use yumi::capture::{AudioBuffer, CaptureGate};
use yumi::error::{YumiError, YumiResult};

pub struct MockGate {
    results: Mutex<VecDeque<YumiResult<AudioBuffer>>>,
    probe: Option<AudioDeviceProbe>,
}

impl MockGate {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            probe: None,
        }
    }

    pub fn with_probe(probe: AudioDeviceProbe) -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            probe: Some(probe),
        }
    }

    /// Queue a buffer holding `seconds` of mono 44.1kHz audio.
    pub fn push_capture_secs(&self, seconds: f32) {
        let mut buffer = AudioBuffer::new(1, 44100);
        let samples = (seconds * 44100.0) as usize;
        if samples > 0 {
            buffer.push_frame(vec![0i16; samples]);
        }
        self.results.lock().unwrap().push_back(Ok(buffer));
    }

    pub fn push_empty_capture(&self) {
        self.push_capture_secs(0.0);
    }

    pub fn push_failure(&self, reason: &str) {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(YumiError::Capture(reason.to_string())));
    }
}

impl Default for MockGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureGate for MockGate {
    async fn capture(&self) -> YumiResult<AudioBuffer> {
        if let Some(probe) = &self.probe {
            probe.acquire("capture");
        }
        let result = self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AudioBuffer::new(1, 44100)));
        if let Some(probe) = &self.probe {
            probe.release();
        }
        result
    }
}
