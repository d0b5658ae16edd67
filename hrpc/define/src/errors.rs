//! Error types for schema parsing.

use thiserror::Error;

/// Errors produced while tokenizing or parsing schema text.
///
/// Every variant that points at a location in the source carries a 1-based
/// `line` and `column`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("{line}:{column}: unexpected character '{found}'")]
    UnexpectedChar {
        found: char,
        line: usize,
        column: usize,
    },

    /// A string literal without its closing quote.
    #[error("{line}:{column}: unterminated string literal")]
    UnterminatedString { line: usize, column: usize },

    /// A `/*` comment without its closing `*/`.
    #[error("{line}:{column}: unterminated block comment")]
    UnterminatedComment { line: usize, column: usize },

    /// A token other than the one the grammar requires.
    #[error("{line}:{column}: expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    /// The input ended in the middle of a declaration.
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    /// A field tag that is not a positive integer.
    #[error("{line}:{column}: invalid field tag `{value}`")]
    InvalidTag {
        value: String,
        line: usize,
        column: usize,
    },

    /// Streaming methods have no request/response slot to bind to.
    #[error("{line}:{column}: streaming rpc `{method}` is not supported")]
    StreamingUnsupported {
        method: String,
        line: usize,
        column: usize,
    },
}
