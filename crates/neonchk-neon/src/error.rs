//! # Decode Errors
//!
//! A single structured error for every way NEON decoding can fail. The
//! rendered message always ends with the position phrase
//! `on line L, column C.` so that tools reading only the message text can
//! still recover the location.

use thiserror::Error;

/// NEON decoding failure with a 1-based source position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} on line {line}, column {column}.")]
pub struct DecodeError {
    /// What went wrong, without the position suffix (e.g. `Unexpected ','`).
    pub message: String,
    /// 1-based line of the offending token.
    pub line: usize,
    /// 1-based column (in characters) of the offending token.
    pub column: usize,
}

impl DecodeError {
    /// Build an error at the given position.
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    /// `Unexpected '<token>'` at the given position.
    pub fn unexpected(token: &str, line: usize, column: usize) -> Self {
        Self::new(format!("Unexpected '{token}'"), line, column)
    }

    /// `Unexpected end` at the given position.
    pub fn unexpected_end(line: usize, column: usize) -> Self {
        Self::new("Unexpected end", line, column)
    }
}
