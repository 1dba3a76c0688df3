use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Uh oh, something went wrong with the server, please let us know about this problem!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvariantViolation,
    ServerRejection,
    TransportFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Warning,
    Alert,
}

/// Dismissible banner shown for every non-applied outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: ErrorCode,
    pub message: String,
}

impl Notice {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn transport_failure() -> Self {
        Self::new(ErrorCode::TransportFailure, TRANSPORT_FAILURE_MESSAGE)
    }

    pub fn severity(&self) -> NoticeSeverity {
        match self.code {
            ErrorCode::InvariantViolation | ErrorCode::ServerRejection => NoticeSeverity::Warning,
            ErrorCode::TransportFailure => NoticeSeverity::Alert,
        }
    }

    /// Warnings fade out on their own; alerts stay until dismissed.
    pub fn fades(&self) -> bool {
        self.severity() == NoticeSeverity::Warning
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct NoticeException {
    pub code: ErrorCode,
    pub message: String,
}

impl From<Notice> for NoticeException {
    fn from(value: Notice) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}
