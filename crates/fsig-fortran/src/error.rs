//! Parse errors.

use thiserror::Error;

/// Failure to extract routine metadata from a source file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    /// No FUNCTION or SUBROUTINE statement was found.
    #[error("no FUNCTION or SUBROUTINE statement found")]
    NoRoutine,

    /// A malformed statement.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line,
            message: message.into(),
        }
    }
}
