pub mod mock_agent;
pub mod mock_asr;
pub mod mock_console;
pub mod mock_endpoint;
pub mod mock_gate;
pub mod mock_tts;

use std::sync::{Arc, Mutex};

/// Shared stand-in for the single audio device. Capture and playback mocks
/// flip it on entry/exit and panic if they ever find it already held, which
/// catches any overlap between the two phases.
#[derive(Clone, Debug, Default)]
pub struct AudioDeviceProbe {
    busy: Arc<Mutex<bool>>,
}

impl AudioDeviceProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, who: &str) {
        let mut busy = self.busy.lock().unwrap();
        assert!(!*busy, "{who} started while the audio device was in use");
        *busy = true;
    }

    pub fn release(&self) {
        *self.busy.lock().unwrap() = false;
    }
}
