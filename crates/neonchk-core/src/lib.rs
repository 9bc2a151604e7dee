#![deny(missing_docs)]

//! # neonchk-core — Configuration Rule Engine
//!
//! Audits decoded NEON configuration trees against two kinds of policy rule
//! and reports decoder failures with a source excerpt.
//!
//! ## Modules
//!
//! - [`rules`]: parsing of `a:b:c` key rules and `a:b:c:literal` value rules.
//! - [`matcher`]: key-path existence and subtree containment over a [`Value`].
//! - [`flatten`]: dotted-key flattening and strict-scalar classification.
//! - [`locate`]: position extraction from decoder messages and line-windowed
//!   excerpts.
//! - [`discovery`]: recursive `*.neon` file discovery.
//! - [`check`]: the rule-check runner.
//! - [`validate`]: the validate runner (parse check, optional strict-scalar).
//! - [`report`]: serializable run reports.
//! - [`error`]: error types.
//!
//! All checks are pure functions over an immutable tree. Files are processed
//! sequentially in discovery order and each tree is dropped after its checks.
//!
//! [`Value`]: neonchk_neon::Value

pub mod check;
pub mod discovery;
pub mod error;
pub mod flatten;
pub mod locate;
pub mod matcher;
pub mod report;
pub mod rules;
pub mod validate;

pub use check::{check_tree, run_rule_check};
pub use discovery::find_neon_files;
pub use error::{CheckerError, RuleSpecError};
pub use flatten::{flatten, non_scalar_entries, FlatEntry};
pub use locate::{locate, render, Location};
pub use matcher::{path_exists, subtree_diff, subtree_matches};
pub use report::{
    CheckReport, FileViolations, ParseFailure, RuleKind, ScalarViolation, ValidateFailure,
    ValidateReport, ViolationRecord,
};
pub use rules::{parse_key_rule, parse_value_rule, KeyPath, RuleSet, ValueRule};
pub use validate::{run_validate, validate_source, ValidateMode};
