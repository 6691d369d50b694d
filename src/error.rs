//! Yumi Error Types
//!
//! Every failing stage maps to exactly one variant so the operator always
//! sees a single line naming the stage and the underlying reason.

use thiserror::Error;

/// Central error type for Yumi
#[derive(Error, Debug)]
pub enum YumiError {
    #[error("audio capture error: {0}")]
    Capture(String),

    #[error("transcription error: {0}")]
    Transcription(String),

    #[error("agent error: {0}")]
    Agent(String),

    #[error("speech output error: {0}")]
    Speech(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Control-session lifecycle failures.
///
/// `ConnectFailed` and `AuthFailed` abort startup; `CloseFailed` is logged
/// and swallowed at shutdown.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session connect failed: {0}")]
    ConnectFailed(String),

    #[error("session authentication failed: {0}")]
    AuthFailed(String),

    #[error("session close failed: {0}")]
    CloseFailed(String),
}

impl SessionError {
    /// True for the startup-phase failures that must abort the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SessionError::CloseFailed(_))
    }
}

/// Result type alias for Yumi operations
pub type YumiResult<T> = Result<T, YumiError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for YumiError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        YumiError::Capture(err.to_string())
    }
}
