//! Mock agent for testing
//!
//! Records every dispatched query and serves scripted replies.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use yumi::agent::Agent;
use yumi::error::{YumiError, YumiResult};

pub struct MockAgent {
    replies: Mutex<VecDeque<YumiResult<String>>>,
    dispatched: Arc<Mutex<Vec<String>>>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            dispatched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_failure(&self, reason: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(YumiError::Agent(reason.to_string())));
    }

    /// Handle that stays valid after the agent moves into the app.
    pub fn dispatched_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.dispatched)
    }
}

impl Default for MockAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for MockAgent {
    async fn dispatch(&self, text: &str) -> YumiResult<String> {
        self.dispatched.lock().unwrap().push(text.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}
