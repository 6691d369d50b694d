//! Mock transcriber for testing
//!
//! Returns scripted transcripts; records the duration of every buffer it
//! was handed so tests can check the capture bound.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use yumi::asr::Transcriber;
use yumi::capture::AudioBuffer;
use yumi::error::{YumiError, YumiResult};

pub struct MockTranscriber {
    results: VecDeque<YumiResult<String>>,
    seen_durations: Arc<Mutex<Vec<f32>>>,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            results: VecDeque::new(),
            seen_durations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push_transcript(&mut self, text: &str) {
        self.results.push_back(Ok(text.to_string()));
    }

    pub fn push_failure(&mut self, reason: &str) {
        self.results
            .push_back(Err(YumiError::Transcription(reason.to_string())));
    }

    /// Handle that stays valid after the transcriber moves into the app.
    pub fn durations_handle(&self) -> Arc<Mutex<Vec<f32>>> {
        Arc::clone(&self.seen_durations)
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&mut self, buffer: &AudioBuffer) -> YumiResult<String> {
        self.seen_durations
            .lock()
            .unwrap()
            .push(buffer.duration_secs());
        self.results.pop_front().unwrap_or_else(|| Ok(String::new()))
    }
}
