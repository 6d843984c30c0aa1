use serde::{Deserialize, Serialize};

/// Events emitted by the privileged service during a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DaemonEvent {
    /// A new transaction step started
    Action(String),

    /// Progress of the current step; `status` is a percentage-like string
    ActionProgress { action: String, status: String },

    /// Progress of a pre/post transaction hook
    HookProgress {
        action: String,
        details: String,
        status: String,
    },

    /// The transaction failed; `details` carries one line per cause
    Error {
        message: String,
        details: Vec<String>,
    },

    /// Non-fatal problem reported by the service
    Warning(String),

    /// The transaction ended
    Finished { success: bool },
}

impl DaemonEvent {
    /// Whether the session stops waiting after this event
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::Finished { .. })
    }
}
