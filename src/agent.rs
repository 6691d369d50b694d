//! Agent dispatcher
//!
//! Sends one text query to the conversational agent and returns its reply.
//! No internal retry: retry policy belongs to the orchestration loop.

use crate::config::Config;
use crate::error::{YumiError, YumiResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Trait for conversational agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Dispatch `text` and await the reply. Empty or whitespace-only input
    /// is passed through unchanged; the remote agent decides what silence
    /// means.
    async fn dispatch(&self, text: &str) -> YumiResult<String>;
}

/// Agent API response
#[derive(Debug, Deserialize)]
struct AgentResponse {
    response: String,
}

/// HTTP agent speaking the Ollama-style generate API
pub struct HttpAgent {
    url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpAgent {
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.agent_url.clone(),
            model: config.agent_model.clone(),
            timeout: Duration::from_secs(config.agent_timeout_secs),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Agent for HttpAgent {
    async fn dispatch(&self, text: &str) -> YumiResult<String> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
                "stream": false
            }))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| YumiError::Agent(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| YumiError::Agent(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(YumiError::Agent(format!("agent returned {status}: {body}")));
        }

        debug!("agent raw body: {}", body);

        let parsed: AgentResponse = serde_json::from_str(&body)
            .map_err(|e| YumiError::Agent(format!("malformed agent response: {e}")))?;

        Ok(parsed.response)
    }
}
