//! Error types for argument parsing.
//!
//! Two layers exist: [`ParseError`] is produced by value-type parsers
//! and always gets re-wrapped with positional/flag context before it
//! reaches a caller; [`Error`] is the terminal parse outcome a host
//! wrapper maps to process exit behavior.

use thiserror::Error;

use crate::fmt::{quoted, quoted_list};

/// Failure raised by an [`ArgumentType`](crate::ArgumentType) parser
/// for a single raw token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{} is not a number", quoted(.0))]
    NotANumber(String),

    #[error("{} is not an integer", quoted(.0))]
    NotAnInteger(String),

    #[error("{} is not a boolean", quoted(.0))]
    NotABoolean(String),

    #[error("{} is not a valid date", quoted(.0))]
    NotADate(String),

    #[error("expected one of {} but received {}", quoted_list(.expected), quoted(.received))]
    NoSuchChoice {
        expected: Vec<String>,
        received: String,
    },

    /// Free-form failure for user-defined argument types.
    #[error("{0}")]
    Custom(String),
}

impl ParseError {
    /// Build a failure with a custom message, for argument types
    /// implemented outside this crate.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Terminal outcome of a parse besides success.
///
/// The two variants carry ready-to-display text and map to different
/// process exit behavior: `Argument` goes to stderr with a non-zero
/// status, `Help` goes to stdout with status zero. `run()` on
/// [`Command`](crate::Command) and [`CommandGroup`](crate::CommandGroup)
/// implements exactly that mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The user supplied invalid input: a missing or malformed
    /// argument, an unknown flag, or an unknown subcommand.
    #[error("{0}")]
    Argument(String),

    /// The user asked for help (`-h`/`--help`); not a real failure.
    #[error("{0}")]
    Help(String),
}

impl Error {
    /// The displayable message, regardless of variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Argument(msg) | Self::Help(msg) => msg.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_messages_quote_the_raw_token() {
        assert_eq!(
            ParseError::NotANumber("abc".to_string()).to_string(),
            "'abc' is not a number"
        );
        assert_eq!(
            ParseError::NotADate("2021-99-99".to_string()).to_string(),
            "'2021-99-99' is not a valid date"
        );
        assert_eq!(
            ParseError::NotABoolean("it's".to_string()).to_string(),
            "'it\\'s' is not a boolean"
        );
    }

    #[test]
    fn choice_error_lists_every_candidate() {
        let err = ParseError::NoSuchChoice {
            expected: vec!["yes".to_string(), "no".to_string()],
            received: "maybe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "expected one of 'yes', 'no' but received 'maybe'"
        );
    }

    #[test]
    fn error_exposes_its_message() {
        let err = Error::Argument("Missing argument <name>".to_string());
        assert_eq!(err.message(), "Missing argument <name>");
        let help = Error::Help("usage text".to_string());
        assert_eq!(help.message(), "usage text");
    }
}
