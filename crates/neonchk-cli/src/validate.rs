//! # Validate Subcommand
//!
//! Tries to decode every `*.neon` file under the given directories and
//! reports the ones that fail, with the failing line when the decoder
//! message names one. `--type strict-scalar` (alias `translate`) also
//! reports leaves that decode to entities or date/time values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use neonchk_core::{run_validate as validate_dirs, ValidateMode};

use crate::config::CheckerConfig;
use crate::exit_code;
use crate::output::{print_validate_report, OutputOptions};

/// Arguments for the `neon-checker validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Directories to scan for *.neon files. Entries that are not
    /// directories are skipped.
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Type of check: `normal`, or `strict-scalar` (alias `translate`) to
    /// also require every value to be a plain scalar.
    #[arg(long = "type", value_name = "TYPE")]
    pub mode: Option<ValidateMode>,
}

/// Execute the validate subcommand.
///
/// Returns the number of failures found, capped at 255.
pub fn run_validate(
    args: &ValidateArgs,
    config: &CheckerConfig,
    opts: OutputOptions,
) -> Result<u8> {
    let dirs = config.dirs_or(&args.dirs);
    let mode = args.mode.or(config.validate_type).unwrap_or_default();
    tracing::info!(dirs = dirs.len(), %mode, "validating");

    let report = validate_dirs(&dirs, mode).context("validation failed")?;
    print_validate_report(&report, opts)?;

    Ok(exit_code(report.failure_count()))
}
