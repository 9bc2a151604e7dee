//! # Validate Runner
//!
//! Decodes every `*.neon` file under the given roots. In
//! [`ValidateMode::Normal`] only decoder failures are reported; in
//! [`ValidateMode::StrictScalar`] files that decode are additionally
//! flattened and every non-primitive leaf is reported.
//!
//! Per file: decode, then on failure locate and record the message; on
//! success in strict mode flatten and classify the leaves. Content that is
//! not UTF-8 is a failure of its own, positioned at the first bad byte.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use neonchk_neon::{decode, encode};
use serde::{Deserialize, Serialize};

use crate::discovery::{find_neon_files, read_source};
use crate::error::CheckerError;
use crate::flatten::non_scalar_entries;
use crate::report::{ParseFailure, ScalarViolation, ValidateFailure, ValidateReport};

/// How strict the validate runner is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidateMode {
    /// Files must decode.
    #[default]
    Normal,
    /// Files must decode and every leaf must be a primitive scalar.
    #[serde(alias = "translate")]
    StrictScalar,
}

impl fmt::Display for ValidateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::StrictScalar => f.write_str("strict-scalar"),
        }
    }
}

impl FromStr for ValidateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "strict-scalar" | "translate" => Ok(Self::StrictScalar),
            other => Err(format!(
                "unknown validate type '{other}'; expected 'normal' or 'strict-scalar' (alias 'translate')"
            )),
        }
    }
}

/// Validate one file's source text.
pub fn validate_source(file: &Path, source: &str, mode: ValidateMode) -> Vec<ValidateFailure> {
    let tree = match decode(source) {
        Ok(tree) => tree,
        Err(e) => {
            return vec![ValidateFailure::Parse(ParseFailure::new(
                file,
                e.to_string(),
                source,
            ))];
        }
    };

    if mode == ValidateMode::Normal {
        return Vec::new();
    }

    non_scalar_entries(&tree)
        .into_iter()
        .map(|entry| {
            ValidateFailure::NonScalar(ScalarViolation {
                file: file.to_path_buf(),
                key: entry.key,
                value: encode(&entry.value),
            })
        })
        .collect()
}

/// Validate all `*.neon` files under `dirs`.
///
/// Roots that are not directories are skipped with a warning.
pub fn run_validate<P: AsRef<Path>>(
    dirs: &[P],
    mode: ValidateMode,
) -> Result<ValidateReport, CheckerError> {
    let roots: Vec<PathBuf> = dirs
        .iter()
        .map(|d| d.as_ref().to_path_buf())
        .filter(|d| {
            let exists = d.is_dir();
            if !exists {
                tracing::warn!(dir = %d.display(), "not a directory; skipped");
            }
            exists
        })
        .collect();

    let files = find_neon_files(&roots);
    tracing::info!(files = files.len(), %mode, "validating neon files");

    let mut report = ValidateReport::default();
    for path in &files {
        let source = read_source(path)?;
        report.files_checked += 1;
        let content = match source {
            Ok(content) => content,
            Err(failure) => {
                tracing::debug!(file = %path.display(), "not UTF-8");
                report.failures.push(ValidateFailure::Parse(failure));
                continue;
            }
        };

        let failures = validate_source(path, &content, mode);
        tracing::debug!(file = %path.display(), failures = failures.len(), "validated");
        report.failures.extend(failures);
    }

    Ok(report)
}
