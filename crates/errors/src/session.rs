//! Transaction session error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("privileged service is locked by another client")]
    LockUnavailable,

    #[error("session does not hold the service lock")]
    NotLocked,

    #[error("a transaction is already running in this session")]
    AlreadyRunning,

    #[error("privileged service disconnected before the transaction finished")]
    ServiceDisconnected,
}

impl UserFacingError for SessionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::LockUnavailable => {
                Some("Wait for the running package operation to finish, then commit again.")
            }
            Self::ServiceDisconnected => {
                Some("Check the package manager log; the transaction may be incomplete.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::LockUnavailable)
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::LockUnavailable => "session.lock_unavailable",
            Self::NotLocked => "session.not_locked",
            Self::AlreadyRunning => "session.already_running",
            Self::ServiceDisconnected => "session.service_disconnected",
        };
        Some(code)
    }
}
