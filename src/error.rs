use std::fmt::Display;
use std::io;
use thiserror::Error;

/// Errors produced while parsing or executing a command line.
///
/// Every variant renders with a category label in front of the message, so a
/// printed error tells the user what kind of failure happened without any
/// further context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// Malformed input: unterminated quote, duplicate redirection, empty
    /// pipeline stage and so on. Always raised before anything runs.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// No built-in is registered under the requested name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A referenced file or directory does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Any other I/O failure (permissions, not a directory, write errors).
    #[error("IO error: {0}")]
    Io(String),

    /// Arguments of the wrong shape for a built-in.
    #[error("Invalid argument: {0}")]
    InvalidArgs(String),
}

impl ShellError {
    /// Classifies an I/O error by its kind, keeping `context` in the message.
    pub fn from_io(err: io::Error, context: impl Display) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ShellError::NotFound(format!("{context}: {err}")),
            _ => ShellError::Io(format!("{context}: {err}")),
        }
    }

    /// Execution-time failures that an unsafe invocation is allowed to swallow.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ShellError::NotFound(_) | ShellError::Io(_) | ShellError::InvalidArgs(_)
        )
    }

    /// Failures of a single statement that do not stop the statements after
    /// it: the recoverable kinds and unknown command names.
    pub fn is_statement_local(&self) -> bool {
        self.is_recoverable() || matches!(self, ShellError::UnknownCommand(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_category_label() {
        assert_eq!(
            ShellError::Syntax("unterminated quote".into()).to_string(),
            "Syntax error: unterminated quote"
        );
        assert_eq!(
            ShellError::NotFound("missing.txt".into()).to_string(),
            "File not found: missing.txt"
        );
    }

    #[test]
    fn test_from_io_classifies_by_kind() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            ShellError::from_io(missing, "cat: a.txt"),
            ShellError::NotFound(msg) if msg == "cat: a.txt: gone"
        ));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            ShellError::from_io(denied, "ls: /root"),
            ShellError::Io(_)
        ));
    }

    #[test]
    fn test_only_execution_errors_are_recoverable() {
        assert!(ShellError::Io("x".into()).is_recoverable());
        assert!(ShellError::InvalidArgs("x".into()).is_recoverable());
        assert!(!ShellError::Syntax("x".into()).is_recoverable());
        assert!(!ShellError::UnknownCommand("x".into()).is_recoverable());
    }

    #[test]
    fn test_syntax_errors_are_not_statement_local() {
        assert!(ShellError::NotFound("x".into()).is_statement_local());
        assert!(ShellError::UnknownCommand("x".into()).is_statement_local());
        assert!(!ShellError::Syntax("x".into()).is_statement_local());
    }
}
