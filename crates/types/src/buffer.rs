//! The editable action buffer
//!
//! Holds pending, not yet committed operations as plain text. The buffer is
//! frozen while a commit is in flight and restored when the commit could not
//! be established, so the operator can fix the text and try again.

use crate::action::{parse, Action, ActionSet};
use thiserror::Error;

/// Gap between a token and its description when seeding
const DESCRIPTION_GAP: &str = "    ";

/// Returned when writing to a frozen buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("action buffer is read-only while a commit is in progress")]
pub struct ReadOnlyBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBuffer {
    text: String,
    editable: bool,
}

impl Default for ActionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionBuffer {
    /// Create an empty, editable buffer
    #[must_use]
    pub fn new() -> Self {
        Self::from_text(String::new())
    }

    /// Create an editable buffer holding `text`
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            editable: true,
        }
    }

    /// Seed a buffer from operator tokens, one per line.
    ///
    /// `describe` receives the package name (leading `-` stripped) and may
    /// return a description, which is appended in parentheses so the parser
    /// ignores it.
    pub fn seed<I, S, F>(tokens: I, mut describe: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Option<String>,
    {
        let lines: Vec<String> = tokens
            .into_iter()
            .map(|token| {
                let token = token.as_ref();
                match describe(Action::lookup_name(token)) {
                    Some(desc) if !desc.is_empty() => {
                        format!("{token}{DESCRIPTION_GAP}({desc})")
                    }
                    _ => token.to_string(),
                }
            })
            .collect();
        Self::from_text(lines.join("\n"))
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the buffer contents
    ///
    /// # Errors
    ///
    /// Returns [`ReadOnlyBuffer`] while the buffer is frozen.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ReadOnlyBuffer> {
        if !self.editable {
            return Err(ReadOnlyBuffer);
        }
        self.text = text.into();
        Ok(())
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Make the buffer read-only for the duration of a commit
    pub fn freeze(&mut self) {
        self.editable = false;
    }

    /// Return the buffer to an editable state
    pub fn restore(&mut self) {
        self.editable = true;
    }

    /// Whether the buffer holds at least one token (commit is possible)
    #[must_use]
    pub fn has_tokens(&self) -> bool {
        self.text.split_whitespace().next().is_some()
    }

    /// Parse the current contents
    #[must_use]
    pub fn actions(&self) -> ActionSet {
        parse(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_with_descriptions() {
        let buffer = ActionBuffer::seed(["vlc", "-vi", "/tmp/a.zst"], |name| match name {
            "vlc" => Some("media player".to_string()),
            "vi" => Some("editor".to_string()),
            _ => None,
        });
        assert_eq!(
            buffer.text(),
            "vlc    (media player)\n-vi    (editor)\n/tmp/a.zst"
        );

        let set = buffer.actions();
        assert_eq!(set.install, vec!["vlc"]);
        assert_eq!(set.remove, vec!["vi"]);
        assert_eq!(set.load, vec!["/tmp/a.zst"]);
    }

    #[test]
    fn test_seed_looks_up_without_dash() {
        let mut seen = Vec::new();
        let _ = ActionBuffer::seed(["-vi"], |name| {
            seen.push(name.to_string());
            None
        });
        assert_eq!(seen, vec!["vi"]);
    }

    #[test]
    fn test_freeze_and_restore() {
        let mut buffer = ActionBuffer::from_text("vlc");
        assert!(buffer.is_editable());

        buffer.freeze();
        assert_eq!(buffer.set_text("foo"), Err(ReadOnlyBuffer));
        assert_eq!(buffer.text(), "vlc");

        buffer.restore();
        buffer.set_text("foo").unwrap();
        assert_eq!(buffer.text(), "foo");
    }

    #[test]
    fn test_has_tokens() {
        assert!(!ActionBuffer::new().has_tokens());
        assert!(!ActionBuffer::from_text("  \n\t").has_tokens());
        assert!(ActionBuffer::from_text("vlc").has_tokens());
    }
}
