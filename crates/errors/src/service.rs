//! Privileged service error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("failed to spawn {command}: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("lock file {path}: {message}")]
    LockFile { path: String, message: String },

    #[error("service not subscribed: start called without an event channel")]
    NotSubscribed,

    #[error("transaction already in progress")]
    Busy,

    #[error("service call {call} failed: {message}")]
    CallFailed { call: String, message: String },
}

impl UserFacingError for ServiceError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SpawnFailed { .. } => {
                Some("Check that the escalation and pacman commands in the config exist.")
            }
            Self::LockFile { .. } => Some("Ensure the lock directory exists and is writable."),
            Self::Busy => Some("Wait for the current transaction to finish."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy | Self::LockFile { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SpawnFailed { .. } => "service.spawn_failed",
            Self::LockFile { .. } => "service.lock_file",
            Self::NotSubscribed => "service.not_subscribed",
            Self::Busy => "service.busy",
            Self::CallFailed { .. } => "service.call_failed",
        };
        Some(code)
    }
}
