//! # Error Types
//!
//! [`RuleSpecError`] rejects a malformed rule before any file is read.
//! [`CheckerError`] covers operational failures of a run. Per-file decoder
//! failures are not errors at this level: they become report entries.

use std::path::PathBuf;

use thiserror::Error;

/// A rule specification that cannot be turned into a rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleSpecError {
    /// Neither key rules nor value rules were supplied.
    #[error("at least one disallowed key or disallowed value must be given")]
    NoRules,

    /// The rule text is empty.
    #[error("rule is empty")]
    EmptyPath,

    /// A `:`-separated segment is empty, e.g. `a::b` or `:a`.
    #[error("rule '{0}' contains an empty key segment")]
    EmptySegment(String),

    /// A value rule without any `:` separating path and value.
    #[error("value rule '{0}' has no key path; expected 'key:...:value'")]
    MissingPath(String),

    /// A value rule ending in `:`.
    #[error("value rule '{0}' has no value after the last ':'")]
    MissingLiteral(String),
}

/// Operational failure of a check or validate run.
#[derive(Error, Debug)]
pub enum CheckerError {
    /// A discovered file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A root directory given to the rule checker does not exist.
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Invalid rule specification.
    #[error("invalid rule: {0}")]
    RuleSpec(#[from] RuleSpecError),
}
