//! Transaction session lifecycle
//!
//! ```text
//! Idle --lock ok--> Locked --run--> Running --terminal--> Closed
//! ```
//!
//! The service handle is dropped on the transition into `Closed`. Release
//! happens at most once, either explicitly, at the end of `run`, or from
//! `Drop`.

use crate::service::{PrivilegedService, StartRequest};
use pinst_errors::{Error, SessionError};
use pinst_events::{channel, EventRouter, MessageSink, Routed, SessionContext};
use pinst_types::ActionSet;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Lifecycle state of a [`TransactionSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Locked,
    Running,
    Closed,
}

/// Summary of a completed transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
    /// `Finished.success` if the service sent one
    pub finished: Option<bool>,
    pub errors: usize,
    pub warnings: usize,
}

impl TransactionOutcome {
    /// The service reported success and no error was seen
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors == 0 && self.finished == Some(true)
    }
}

/// Exclusive use of a privileged service for one transaction
pub struct TransactionSession<S: PrivilegedService> {
    service: Option<S>,
    state: SessionState,
    context: SessionContext,
}

impl<S: PrivilegedService> TransactionSession<S> {
    /// Wrap a service handle without touching it
    pub fn new(service: S) -> Self {
        Self {
            service: Some(service),
            state: SessionState::Idle,
            context: SessionContext::new(),
        }
    }

    /// Create a session and take the service lock
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LockUnavailable`] if another client holds the
    /// lock, or the transport error from the lock call.
    pub fn acquire(service: S) -> Result<Self, Error> {
        let mut session = Self::new(service);
        session.lock()?;
        Ok(session)
    }

    /// Take the service lock
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LockUnavailable`] when the lock is held
    /// elsewhere. A transport failure releases the service before the error
    /// is returned.
    pub fn lock(&mut self) -> Result<(), Error> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Locked => return Ok(()),
            SessionState::Running => return Err(SessionError::AlreadyRunning.into()),
            SessionState::Closed => return Err(SessionError::NotLocked.into()),
        }
        let service = self.service.as_mut().ok_or(SessionError::NotLocked)?;

        match service.get_lock() {
            Ok(true) => {
                self.state = SessionState::Locked;
                info!(session = %self.context.session_id, "service locked");
                Ok(())
            }
            Ok(false) => {
                debug!(session = %self.context.session_id, "service lock held elsewhere");
                Err(SessionError::LockUnavailable.into())
            }
            Err(e) => {
                // the lock may have been taken before the call failed
                warn!(session = %self.context.session_id, error = %e, "lock call failed");
                self.teardown();
                Err(e)
            }
        }
    }

    /// Run one transaction, routing every service event to `sink`
    ///
    /// Returns once a terminal event has been routed and the service
    /// released. After an `Error` the session keeps listening until
    /// `Finished` arrives or the service closes the stream. There is no
    /// timeout: an unresponsive service keeps this future pending.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLocked`] unless the session is locked,
    /// the error of the start call, or [`SessionError::ServiceDisconnected`]
    /// when the event stream ends without a terminal event.
    pub async fn run(
        &mut self,
        actions: &ActionSet,
        sink: &mut dyn MessageSink,
    ) -> Result<TransactionOutcome, Error> {
        match self.state {
            SessionState::Locked => {}
            SessionState::Running => return Err(SessionError::AlreadyRunning.into()),
            SessionState::Idle | SessionState::Closed => {
                return Err(SessionError::NotLocked.into())
            }
        }
        let service = self.service.as_mut().ok_or(SessionError::NotLocked)?;

        let (tx, mut rx) = channel();
        service.subscribe(tx);
        let request = StartRequest::from(actions);
        self.state = SessionState::Running;
        info!(session = %self.context.session_id, %actions, "starting transaction");

        if let Err(e) = service.start(&request) {
            warn!(session = %self.context.session_id, error = %e, "start failed");
            self.teardown();
            return Err(e);
        }

        let context = self.context.clone();
        let mut router = EventRouter::new(sink, &context);
        let mut terminal = false;
        while let Some(event) = rx.recv().await {
            if router.route(&event) == Routed::Terminal {
                terminal = true;
                break;
            }
        }

        // an Error is followed by Finished or by the end of the stream
        if terminal && router.finished().is_none() {
            while let Some(event) = rx.recv().await {
                router.route(&event);
                if router.finished().is_some() {
                    break;
                }
            }
        }

        if terminal {
            while let Ok(event) = rx.try_recv() {
                router.route(&event);
            }
        }

        self.teardown();

        // events sent while the service was shutting down
        while let Ok(event) = rx.try_recv() {
            router.route(&event);
        }

        if !terminal {
            warn!(session = %context.session_id, "event stream closed without a terminal event");
            return Err(SessionError::ServiceDisconnected.into());
        }

        let outcome = TransactionOutcome {
            finished: router.finished(),
            errors: router.errors(),
            warnings: router.warnings(),
        };
        info!(
            session = %context.session_id,
            finished = ?outcome.finished,
            errors = outcome.errors,
            warnings = outcome.warnings,
            "transaction complete"
        );
        Ok(outcome)
    }

    /// Unlock and shut down the service
    ///
    /// Failures are logged and swallowed. Calling this more than once has no
    /// further effect.
    pub fn release(&mut self) {
        match self.state {
            SessionState::Locked | SessionState::Running => self.teardown(),
            SessionState::Idle => self.state = SessionState::Closed,
            SessionState::Closed => {}
        }
    }

    fn teardown(&mut self) {
        if let Some(mut service) = self.service.take() {
            if let Err(e) = service.unlock() {
                warn!(session = %self.context.session_id, error = %e, "unlock failed");
            }
            if let Err(e) = service.quit_daemon() {
                warn!(session = %self.context.session_id, error = %e, "quit_daemon failed");
            }
            debug!(session = %self.context.session_id, "service released");
        }
        self.state = SessionState::Closed;
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }
}

impl<S: PrivilegedService> Drop for TransactionSession<S> {
    fn drop(&mut self) {
        if matches!(self.state, SessionState::Locked | SessionState::Running) {
            self.teardown();
        }
    }
}

impl<S: PrivilegedService> std::fmt::Debug for TransactionSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSession")
            .field("state", &self.state)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
