use crate::buffer::Pos;
use thiserror::Error;

/// Result type for rewrite operations
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Errors that abort rewriting of the current file
#[derive(Error, Debug)]
pub enum RewriteError {
    /// No matching bracket before the buffer ran out
    #[error("no matching {expected:?} for {bracket:?} at line {}, column {}", .line + 1, .col + 1)]
    Unmatched {
        bracket: char,
        expected: char,
        line: usize,
        col: usize,
    },

    /// Bracket matcher invoked on something that is not a bracket
    #[error("{found:?} at line {}, column {} is not a grouping symbol", .line + 1, .col + 1)]
    NotABracket { found: char, line: usize, col: usize },

    /// Expression shape the engine cannot make sense of
    #[error("line {}: {message}", .line + 1)]
    Malformed { line: usize, message: String },

    /// Construct whose meaning depends on context the engine does not track
    #[error("line {}: {what} is not supported", .line + 1)]
    NotImplemented { line: usize, what: String },

    /// An edit was anchored at a coordinate that no longer holds the expected text
    #[error("stale coordinate at line {}, column {}: expected {expected:?}, found {found:?}", .line + 1, .col + 1)]
    StaleCoordinate {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Symbol table could not be parsed
    #[error("Invalid symbol table: {0}")]
    InvalidSymbols(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RewriteError {
    pub(crate) fn unmatched(bracket: u8, expected: u8, at: Pos) -> Self {
        Self::Unmatched {
            bracket: char::from(bracket),
            expected: char::from(expected),
            line: at.line,
            col: at.col,
        }
    }

    pub(crate) fn not_a_bracket(found: u8, at: Pos) -> Self {
        Self::NotABracket {
            found: char::from(found),
            line: at.line,
            col: at.col,
        }
    }

    /// Create a malformed-expression error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Create a not-implemented error
    pub fn not_implemented(line: usize, what: impl Into<String>) -> Self {
        Self::NotImplemented {
            line,
            what: what.into(),
        }
    }

    pub(crate) fn stale(at: Pos, expected: &str, found: &str) -> Self {
        Self::StaleCoordinate {
            line: at.line,
            col: at.col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Whether this error reflects the shape of the input rather than a bug in a pass
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Unmatched { .. }
                | Self::NotABracket { .. }
                | Self::Malformed { .. }
                | Self::NotImplemented { .. }
        )
    }
}
