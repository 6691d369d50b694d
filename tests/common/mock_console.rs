//! Scripted console for testing
//!
//! Serves a fixed sequence of operator entries and records everything the
//! loop prints, prompts included.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use yumi::app::Console;
use yumi::error::YumiResult;

pub struct MockConsole {
    inputs: VecDeque<String>,
    fail_when_exhausted: bool,
    written: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockConsole {
    pub fn with_inputs(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            fail_when_exhausted: false,
            written: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serves `inputs`, then fails every read as if stdin went away.
    pub fn failing_after(inputs: &[&str]) -> Self {
        Self {
            fail_when_exhausted: true,
            ..Self::with_inputs(inputs)
        }
    }

    pub fn written_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.written)
    }

    pub fn prompts_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl Console for MockConsole {
    fn read_line(&mut self, prompt: &str) -> YumiResult<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.inputs.pop_front() {
            Some(entry) => Ok(Some(entry)),
            None if self.fail_when_exhausted => Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "terminal disconnected",
            )
            .into()),
            None => Ok(None),
        }
    }

    fn write_line(&mut self, line: &str) {
        self.written.lock().unwrap().push(line.to_string());
    }
}

/// True if any recorded line contains `needle` (color codes ignored by
/// substring match on the plain text).
pub fn any_line_contains(lines: &Arc<Mutex<Vec<String>>>, needle: &str) -> bool {
    lines.lock().unwrap().iter().any(|l| l.contains(needle))
}
