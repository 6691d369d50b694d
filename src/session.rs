//! Avatar-control session lifecycle
//!
//! The manager exclusively owns the endpoint handle and is the only place
//! connect/close transitions happen. Connect or authenticate failures are
//! fatal to the run; close failures are reported but never fatal.

use crate::error::SessionError;
use async_trait::async_trait;
use tracing::info;

/// Lifecycle states of the control session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Authenticated,
    Active,
    /// Terminal: reached by `close()`.
    Closed,
    /// Terminal: connect or authenticate failed; no turn may run.
    Failed,
}

/// External control endpoint consumed through a fixed contract
/// (e.g. the VTube Studio WebSocket API).
#[async_trait]
pub trait ControlEndpoint: Send {
    async fn connect(&mut self) -> anyhow::Result<()>;
    async fn authenticate(&mut self) -> anyhow::Result<()>;
    async fn close(&mut self) -> anyhow::Result<()>;
}

/// Owns the single control session for the process run.
pub struct SessionManager {
    endpoint: Box<dyn ControlEndpoint>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(endpoint: Box<dyn ControlEndpoint>) -> Self {
        Self {
            endpoint,
            state: SessionState::Disconnected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Drive the session to `Active`, or to terminal `Failed`.
    pub async fn connect_and_authenticate(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Connecting;

        if let Err(e) = self.endpoint.connect().await {
            self.state = SessionState::Failed;
            return Err(SessionError::ConnectFailed(e.to_string()));
        }

        if let Err(e) = self.endpoint.authenticate().await {
            self.state = SessionState::Failed;
            return Err(SessionError::AuthFailed(e.to_string()));
        }

        self.state = SessionState::Authenticated;
        info!("✅ Connected & authenticated to avatar session");

        self.state = SessionState::Active;
        Ok(())
    }

    /// Close the session. Idempotent: closing a session that is already
    /// `Closed` or was never `Active` is a no-op. An endpoint failure is
    /// returned as `CloseFailed` but the state still becomes `Closed`.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Ok(());
        }

        let result = self.endpoint.close().await;
        self.state = SessionState::Closed;
        result.map_err(|e| SessionError::CloseFailed(e.to_string()))
    }
}
