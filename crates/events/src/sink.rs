//! Presentation boundary for routed messages

use crate::Severity;

/// Renders or records severity-tagged text
///
/// Implementations may be called while the owning session is releasing the
/// service (the terminal message arrives during teardown), so they must not
/// assume the session is still alive.
pub trait MessageSink {
    fn post(&mut self, text: &str, severity: Severity);
}

impl<T: MessageSink + ?Sized> MessageSink for &mut T {
    fn post(&mut self, text: &str, severity: Severity) {
        (**self).post(text, severity);
    }
}

impl<T: MessageSink + ?Sized> MessageSink for Box<T> {
    fn post(&mut self, text: &str, severity: Severity) {
        (**self).post(text, severity);
    }
}

/// Sink that keeps every message in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: Vec<(String, Severity)>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[(String, Severity)] {
        &self.messages
    }

    /// Messages of one severity, text only
    #[must_use]
    pub fn with_severity(&self, severity: Severity) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(_, s)| *s == severity)
            .map(|(text, _)| text.as_str())
            .collect()
    }

    /// The running log as rendered with prefixes
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|(text, severity)| severity.decorate(text))
            .collect()
    }
}

impl MessageSink for RecordingSink {
    fn post(&mut self, text: &str, severity: Severity) {
        self.messages.push((text.to_string(), severity));
    }
}
