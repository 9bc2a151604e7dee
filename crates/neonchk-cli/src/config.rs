//! # Configuration File
//!
//! Optional YAML file passed with `--config`, so a project can keep its
//! policy next to its sources:
//!
//! ```yaml
//! dirs: [app/config]
//! disallowed_keys:
//!   - http:csp
//! disallowed_values:
//!   - http:frames:yes
//! validate_type: strict-scalar
//! ```
//!
//! Directory arguments on the command line replace `dirs`; rule options are
//! appended to the file's rules; `--type` overrides `validate_type`.
//! Relative `dirs` are resolved against the config file's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use neonchk_core::ValidateMode;

use crate::resolve_path;

/// Settings read from the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Directories to scan.
    pub dirs: Vec<PathBuf>,
    /// Key rules for `disallowed`.
    pub disallowed_keys: Vec<String>,
    /// Value rules for `disallowed`.
    pub disallowed_values: Vec<String>,
    /// Mode for `validate`.
    pub validate_type: Option<ValidateMode>,
}

impl CheckerConfig {
    /// Load the config file, or the empty config when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.dirs = config.dirs.iter().map(|d| resolve_path(d, base)).collect();

        tracing::debug!(
            config = %path.display(),
            dirs = config.dirs.len(),
            keys = config.disallowed_keys.len(),
            values = config.disallowed_values.len(),
            "loaded config file"
        );
        Ok(config)
    }

    /// Directories to scan: the command line wins when it names any.
    pub fn dirs_or(&self, cli_dirs: &[PathBuf]) -> Vec<PathBuf> {
        if cli_dirs.is_empty() {
            self.dirs.clone()
        } else {
            cli_dirs.to_vec()
        }
    }
}
