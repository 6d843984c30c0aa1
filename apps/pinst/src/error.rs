//! CLI error handling

use std::fmt;

use pinst_errors::UserFacingError;
use pinst_types::ReadOnlyBuffer;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(pinst_errors::ConfigError),
    /// Session or service error
    Ops(pinst_errors::Error),
    /// The action buffer was written while frozen
    Buffer(ReadOnlyBuffer),
    /// Editor or prompt failure
    Prompt(String),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Buffer(e) => write!(f, "{e}"),
            CliError::Prompt(msg) => write!(f, "Prompt failed: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Ops(e) => Some(e),
            CliError::Buffer(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Prompt(_) => None,
        }
    }
}

impl From<pinst_errors::ConfigError> for CliError {
    fn from(e: pinst_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<pinst_errors::Error> for CliError {
    fn from(e: pinst_errors::Error) -> Self {
        match e {
            pinst_errors::Error::Config(config) => CliError::Config(config),
            other => CliError::Ops(other),
        }
    }
}

impl From<ReadOnlyBuffer> for CliError {
    fn from(e: ReadOnlyBuffer) -> Self {
        CliError::Buffer(e)
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinst_errors::SessionError;

    #[test]
    fn test_ops_error_display() {
        let err = CliError::from(pinst_errors::Error::from(SessionError::LockUnavailable));
        let text = err.to_string();
        assert!(text.starts_with("privileged service is locked by another client"));
        assert!(text.contains("Code: session.lock_unavailable"));
        assert!(text.contains("Retry: safe to retry"));
    }

    #[test]
    fn test_config_errors_unwrapped() {
        let err = CliError::from(pinst_errors::Error::from(
            pinst_errors::ConfigError::NotFound {
                path: "/nope.toml".into(),
            },
        ));
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: config file not found: /nope.toml"
        );
    }
}
