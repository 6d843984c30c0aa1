use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::Level;

/// Display classification of a message
///
/// Controls the log prefix and, for [`Severity::Critical`], whether the
/// presentation layer interrupts the operator.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Section,
    Detail,
    Critical,
    Warning,
    Plain,
}

impl Severity {
    /// Fixed prefix prepended in the running log
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Info => "-> ",
            Self::Section => ":: ",
            Self::Detail => "   ",
            Self::Critical => "!!! ",
            Self::Warning => "! ",
            Self::Plain => "",
        }
    }

    /// Text as it appears in the running log
    #[must_use]
    pub fn decorate(self, text: &str) -> String {
        format!("{}{text}", self.prefix())
    }

    /// Convert the severity into a tracing level for downstream logging
    #[must_use]
    pub fn tracing_level(self) -> Level {
        match self {
            Self::Critical => Level::ERROR,
            Self::Warning => Level::WARN,
            Self::Detail => Level::DEBUG,
            Self::Info | Self::Section | Self::Plain => Level::INFO,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Section => "section",
            Self::Detail => "detail",
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Plain => "plain",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(Severity::Info.decorate("x"), "-> x");
        assert_eq!(Severity::Section.decorate("x"), ":: x");
        assert_eq!(Severity::Detail.decorate("x"), "   x");
        assert_eq!(Severity::Critical.decorate("x"), "!!! x");
        assert_eq!(Severity::Warning.decorate("x"), "! x");
        assert_eq!(Severity::Plain.decorate("x"), "x");
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Info < Severity::Section);
        assert!(Severity::Critical < Severity::Warning);
        assert!(Severity::Warning < Severity::Plain);
    }
}
