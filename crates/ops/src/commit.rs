//! Commit boundary between the operator buffer and a transaction session

use crate::service::PrivilegedService;
use crate::session::{TransactionOutcome, TransactionSession};
use pinst_errors::{Error, UserFacingError};
use pinst_events::{MessageSink, Severity};
use pinst_types::ActionBuffer;
use tracing::{info, warn};

/// Message posted when another client holds the service
pub const BUSY_MESSAGE: &str = "ERROR: privileged service is busy";

/// Operator-facing text for a failed session
#[must_use]
pub fn failure_message(err: &Error) -> String {
    if err.is_lock_unavailable() {
        BUSY_MESSAGE.to_string()
    } else {
        format!("ERROR: {}", err.user_message())
    }
}

/// Commit the buffer's actions through `service`
///
/// The buffer is frozen for the duration. On success it stays frozen. If the
/// session cannot be established or set up, a single Critical message is
/// posted, the buffer becomes editable again and the error is returned so
/// the caller can offer another attempt.
///
/// A transaction that runs and reports `Error` is not a failure here: those
/// messages reach `sink` through the router and the outcome counts them.
///
/// # Errors
///
/// Returns the session error after it has been posted to `sink`.
pub async fn commit<S: PrivilegedService>(
    buffer: &mut ActionBuffer,
    service: S,
    sink: &mut dyn MessageSink,
) -> Result<TransactionOutcome, Error> {
    buffer.freeze();
    let actions = buffer.actions();
    info!(%actions, "committing");

    let result = match TransactionSession::acquire(service) {
        Ok(mut session) => session.run(&actions, sink).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            warn!(error = %e, "commit failed");
            sink.post(&failure_message(&e), Severity::Critical);
            buffer.restore();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinst_errors::{ServiceError, SessionError};

    #[test]
    fn test_busy_message() {
        let err: Error = SessionError::LockUnavailable.into();
        assert_eq!(failure_message(&err), "ERROR: privileged service is busy");
    }

    #[test]
    fn test_other_failure_message() {
        let err: Error = ServiceError::SpawnFailed {
            command: "pkexec".into(),
            message: "not found".into(),
        }
        .into();
        assert_eq!(
            failure_message(&err),
            "ERROR: failed to spawn pkexec: not found"
        );
    }
}
