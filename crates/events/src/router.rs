//! Routing of service events to severity-tagged messages

use crate::{DaemonEvent, MessageSink, Severity};
use tracing::{debug, error, info, warn, Level};
use uuid::Uuid;

/// Text posted when the service reports the end of a transaction
pub const FINISHED_TEXT: &str = "End.";

/// Per-session state handed to the router by reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Correlation id attached to every log record of the session
    pub session_id: Uuid,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the caller should keep waiting for events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Continue,
    Terminal,
}

/// Translates [`DaemonEvent`]s into sink messages
///
/// | Event            | Severity | Text                                   |
/// |------------------|----------|----------------------------------------|
/// | `Action`         | Info     | verbatim                               |
/// | `ActionProgress` | Detail   | `::{action} {status}`, skipped for `0…`|
/// | `HookProgress`   | Detail   | `{action} {details} {status}`          |
/// | `Error`          | Critical | one per detail, else the summary       |
/// | `Warning`        | Warning  | verbatim                               |
/// | `Finished`       | Plain    | `End.`                                 |
pub struct EventRouter<'a> {
    sink: &'a mut dyn MessageSink,
    context: &'a SessionContext,
    errors: usize,
    warnings: usize,
    finished: Option<bool>,
}

impl<'a> EventRouter<'a> {
    pub fn new(sink: &'a mut dyn MessageSink, context: &'a SessionContext) -> Self {
        Self {
            sink,
            context,
            errors: 0,
            warnings: 0,
            finished: None,
        }
    }

    /// Route a single event to the sink
    pub fn route(&mut self, event: &DaemonEvent) -> Routed {
        match event {
            DaemonEvent::Action(text) => self.post(text, Severity::Info),
            DaemonEvent::ActionProgress { action, status } => {
                if status.starts_with('0') {
                    debug!(session = %self.context.session_id, %action, %status, "progress suppressed");
                } else {
                    self.post(&format!("::{action} {status}"), Severity::Detail);
                }
            }
            DaemonEvent::HookProgress {
                action,
                details,
                status,
            } => self.post(&format!("{action} {details} {status}"), Severity::Detail),
            DaemonEvent::Error { message, details } => {
                self.errors += 1;
                if details.is_empty() {
                    self.post(message, Severity::Critical);
                } else {
                    debug!(session = %self.context.session_id, %message, "error summary replaced by details");
                    for detail in details {
                        self.post(detail, Severity::Critical);
                    }
                }
            }
            DaemonEvent::Warning(message) => {
                self.warnings += 1;
                self.post(message, Severity::Warning);
            }
            DaemonEvent::Finished { success } => {
                self.finished = Some(*success);
                self.post(FINISHED_TEXT, Severity::Plain);
            }
        }

        if event.is_terminal() {
            Routed::Terminal
        } else {
            Routed::Continue
        }
    }

    fn post(&mut self, text: &str, severity: Severity) {
        let session = self.context.session_id;
        let level = severity.tracing_level();
        if level == Level::ERROR {
            error!(%session, %severity, text, "service event");
        } else if level == Level::WARN {
            warn!(%session, %severity, text, "service event");
        } else if level == Level::INFO {
            info!(%session, %severity, text, "service event");
        } else {
            debug!(%session, %severity, text, "service event");
        }
        self.sink.post(text, severity);
    }

    /// Number of `Error` events routed
    #[must_use]
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Number of `Warning` events routed
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// The `Finished.success` flag, if one was routed
    #[must_use]
    pub fn finished(&self) -> Option<bool> {
        self.finished
    }
}
