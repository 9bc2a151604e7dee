//! # Run Reports
//!
//! Plain data produced by the two runners. Every type derives `Serialize`
//! so the CLI can print a report as JSON as well as text.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::locate::{locate, render, Location};

/// Which kind of rule produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// A disallowed key-path.
    Key,
    /// A disallowed key-path/value combination.
    Value,
}

/// One rule matched in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    /// The offending file.
    pub file: PathBuf,
    /// Rule kind.
    pub kind: RuleKind,
    /// The rule as written on the command line.
    pub rule: String,
}

/// All violations of one file, grouped by rule kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileViolations {
    /// The offending file.
    pub file: PathBuf,
    /// Matched key rules, in rule order.
    pub keys: Vec<String>,
    /// Matched value rules, in rule order.
    pub values: Vec<String>,
}

impl FileViolations {
    /// Number of matched rules.
    pub fn count(&self) -> usize {
        self.keys.len() + self.values.len()
    }

    /// The same violations as individual records.
    pub fn records(&self) -> impl Iterator<Item = ViolationRecord> + '_ {
        let keys = self.keys.iter().map(|rule| (RuleKind::Key, rule));
        let values = self.values.iter().map(|rule| (RuleKind::Value, rule));
        keys.chain(values).map(|(kind, rule)| ViolationRecord {
            file: self.file.clone(),
            kind,
            rule: rule.clone(),
        })
    }
}

/// Result of a rule-check run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Number of files decoded and checked against the rules.
    pub files_checked: usize,
    /// Total matched rules over all files.
    pub violation_count: usize,
    /// Files with at least one violation, in discovery order.
    pub files: Vec<FileViolations>,
    /// Files that could not be decoded and were not checked.
    pub skipped: Vec<ParseFailure>,
}

impl CheckReport {
    /// All violations flattened into records.
    pub fn records(&self) -> Vec<ViolationRecord> {
        self.files.iter().flat_map(FileViolations::records).collect()
    }
}

/// A file that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    /// The file.
    pub file: PathBuf,
    /// The decoder message, verbatim.
    pub message: String,
    /// Position parsed out of the message, if it carried one.
    #[serde(flatten)]
    pub location: Location,
    /// Numbered window around the failing line, or the whole source when
    /// the line is unknown.
    pub excerpt: String,
    /// The full source text.
    #[serde(skip)]
    pub source: String,
}

impl ParseFailure {
    /// Record a decoder failure, locating it from the message.
    pub fn new(file: &Path, message: impl Into<String>, source: impl Into<String>) -> Self {
        let message = message.into();
        let source = source.into();
        let location = locate(&message);
        let excerpt = match location.line {
            Some(line) => render(&source, line),
            None => source.clone(),
        };
        Self {
            file: file.to_path_buf(),
            message,
            location,
            excerpt,
            source,
        }
    }

    /// The text to show under the error.
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }
}

/// A leaf that is not a primitive scalar, found in strict-scalar mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarViolation {
    /// The file.
    pub file: PathBuf,
    /// Dotted key of the leaf.
    pub key: String,
    /// The leaf re-encoded as inline NEON.
    pub value: String,
}

impl ScalarViolation {
    /// Human-readable description of the violation.
    pub fn message(&self) -> String {
        format!(
            "Value for key {} is parsed as object (probably contains `()` or it is datetime)",
            self.key
        )
    }
}

/// One failure found by the validate runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidateFailure {
    /// The file did not decode.
    Parse(ParseFailure),
    /// The file decoded but holds a non-scalar leaf.
    NonScalar(ScalarViolation),
}

impl ValidateFailure {
    /// The file the failure belongs to.
    pub fn file(&self) -> &Path {
        match self {
            Self::Parse(f) => &f.file,
            Self::NonScalar(v) => &v.file,
        }
    }

    /// The error line shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Parse(f) => f.message.clone(),
            Self::NonScalar(v) => v.message(),
        }
    }

    /// Source line of the failure, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse(f) => f.location.line,
            Self::NonScalar(_) => None,
        }
    }
}

/// Result of a validate run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidateReport {
    /// Number of `*.neon` files read.
    pub files_checked: usize,
    /// Failures in discovery order.
    pub failures: Vec<ValidateFailure>,
}

impl ValidateReport {
    /// Number of failures.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_violations_flatten_keys_before_values() {
        let fv = FileViolations {
            file: PathBuf::from("a.neon"),
            keys: vec!["http:csp".into()],
            values: vec!["http:frames:yes".into()],
        };
        let records: Vec<_> = fv.records().collect();
        assert_eq!(fv.count(), 2);
        assert_eq!(records[0].kind, RuleKind::Key);
        assert_eq!(records[1].kind, RuleKind::Value);
        assert_eq!(records[1].rule, "http:frames:yes");
    }

    #[test]
    fn parse_failure_locates_itself() {
        let f = ParseFailure::new(
            Path::new("x.neon"),
            "Bad indentation on line 2, column 3.",
            "a: 1\n  b: 2\n",
        );
        assert_eq!(f.location.line, Some(2));
        assert_eq!(f.location.column, Some(3));
        assert_eq!(f.excerpt(), "1: a: 1\n2: >>  b: 2<<\n3: \n");
    }

    #[test]
    fn parse_failure_without_position_shows_raw_source() {
        let f = ParseFailure::new(Path::new("x.neon"), "Unexpected EOF", "raw");
        assert_eq!(f.location, Location::default());
        assert_eq!(f.excerpt(), "raw");
    }

    #[test]
    fn json_shape() {
        let failure = ValidateFailure::Parse(ParseFailure::new(
            Path::new("x.neon"),
            "Unexpected ']' on line 1, column 5.",
            "a: 1]",
        ));
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["type"], "parse");
        assert_eq!(json["line"], 1);
        assert_eq!(json["column"], 5);
        assert_eq!(json["excerpt"], "1: >>a: 1]<<\n");
        assert!(json.get("source").is_none());

        let record = ViolationRecord {
            file: PathBuf::from("a.neon"),
            kind: RuleKind::Value,
            rule: "a:1".into(),
        };
        assert_eq!(serde_json::to_value(&record).unwrap()["kind"], "value");
    }
}
