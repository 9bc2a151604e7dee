//! # Rule-Check Runner
//!
//! Decodes every `*.neon` file under the given roots and reports which
//! disallowed keys and values each one contains.
//!
//! Empty files are skipped without being decoded. A file that fails to
//! decode is recorded in [`CheckReport::skipped`] and the run goes on; use
//! the validate runner to diagnose it. Files that are not UTF-8 are recorded
//! the same way. Rule errors and unreadable files abort the run.

use std::path::Path;

use neonchk_neon::{decode, Value};

use crate::discovery::{find_neon_files, read_source};
use crate::error::CheckerError;
use crate::matcher::{path_exists, subtree_matches};
use crate::report::{CheckReport, FileViolations, ParseFailure};
use crate::rules::RuleSet;

/// Evaluate every rule against one decoded tree.
pub fn check_tree(file: &Path, tree: &Value, rules: &RuleSet) -> FileViolations {
    let keys = rules
        .keys
        .iter()
        .filter(|path| path_exists(tree, path))
        .map(ToString::to_string)
        .collect();
    let values = rules
        .values
        .iter()
        .filter(|rule| subtree_matches(&rule.fragment, tree))
        .map(|rule| rule.spec.clone())
        .collect();
    FileViolations {
        file: file.to_path_buf(),
        keys,
        values,
    }
}

/// Check all `*.neon` files under `dirs` against `rules`.
///
/// Every root must be an existing directory.
pub fn run_rule_check<P: AsRef<Path>>(
    dirs: &[P],
    rules: &RuleSet,
) -> Result<CheckReport, CheckerError> {
    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CheckerError::MissingDirectory(dir.to_path_buf()));
        }
    }

    let files = find_neon_files(dirs);
    tracing::info!(files = files.len(), rules = rules.len(), "checking neon files");

    let mut report = CheckReport::default();
    for path in &files {
        let content = match read_source(path)? {
            Ok(content) => content,
            Err(failure) => {
                tracing::warn!(file = %path.display(), error = %failure.message, "file is not UTF-8; skipped");
                report.skipped.push(failure);
                continue;
            }
        };
        if content.is_empty() {
            tracing::debug!(file = %path.display(), "skipping empty file");
            continue;
        }

        let tree = match decode(&content) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "file does not decode; skipped");
                report.skipped.push(ParseFailure::new(path, e.to_string(), content));
                continue;
            }
        };

        report.files_checked += 1;
        let found = check_tree(path, &tree, rules);
        tracing::debug!(file = %path.display(), violations = found.count(), "checked");
        if found.count() > 0 {
            report.violation_count += found.count();
            report.files.push(found);
        }
    }

    Ok(report)
}
