#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for privileged service transactions
//!
//! The privileged service reports progress through six event kinds, modelled
//! here as the closed [`DaemonEvent`] enum and delivered over a single
//! consumer channel owned by the transaction session.
//!
//! ## Architecture
//!
//! - **Typed events**: one variant per service signal, no callbacks
//! - **`EventEmitter` trait**: consistent emission API for service backends
//! - **`EventRouter`**: maps events to severity-tagged sink messages
//! - **`MessageSink`**: presentation boundary, implemented by the CLI

pub mod event;
pub mod router;
pub mod severity;
pub mod sink;

pub use event::DaemonEvent;
pub use router::{EventRouter, Routed, SessionContext};
pub use severity::Severity;
pub use sink::{MessageSink, RecordingSink};

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for the service → session event sender
pub type EventSender = UnboundedSender<DaemonEvent>;

/// Type alias for the session-owned event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<DaemonEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting service events
///
/// Implemented for the raw [`EventSender`] and for anything that can hand one
/// out, so service backends emit through a single consistent API.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: DaemonEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if the session is gone, nobody is listening
            let _ = sender.send(event);
        }
    }

    fn emit_action(&self, action: impl Into<String>) {
        self.emit(DaemonEvent::Action(action.into()));
    }

    fn emit_action_progress(&self, action: impl Into<String>, status: impl Into<String>) {
        self.emit(DaemonEvent::ActionProgress {
            action: action.into(),
            status: status.into(),
        });
    }

    fn emit_hook_progress(
        &self,
        action: impl Into<String>,
        details: impl Into<String>,
        status: impl Into<String>,
    ) {
        self.emit(DaemonEvent::HookProgress {
            action: action.into(),
            details: details.into(),
            status: status.into(),
        });
    }

    fn emit_error(&self, message: impl Into<String>, details: Vec<String>) {
        self.emit(DaemonEvent::Error {
            message: message.into(),
            details,
        });
    }

    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(DaemonEvent::Warning(message.into()));
    }

    fn emit_finished(&self, success: bool) {
        self.emit(DaemonEvent::Finished { success });
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// An optional subscription behaves as a silent emitter until set
impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
