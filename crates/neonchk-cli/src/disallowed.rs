//! # Disallowed Subcommand
//!
//! Finds disallowed configuration keys and key/value combinations in all
//! `*.neon` files under the given directories.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use neonchk_core::{run_rule_check, RuleSet};

use crate::config::CheckerConfig;
use crate::exit_code;
use crate::output::{print_check_report, OutputOptions};

/// Arguments for the `neon-checker disallowed` subcommand.
#[derive(Args, Debug, Default)]
pub struct DisallowedArgs {
    /// Directories to scan for *.neon files.
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Disallowed key-path; `:` separates levels, e.g. http:frames.
    /// Repeat the option for several keys.
    #[arg(long = "disallowed-keys", value_name = "KEY_PATH")]
    pub disallowed_keys: Vec<String>,

    /// Disallowed key-path and value; the part after the last `:` is the
    /// value, e.g. http:frames:yes. Repeat the option for several values.
    #[arg(long = "disallowed-values", value_name = "KEY_PATH:VALUE")]
    pub disallowed_values: Vec<String>,
}

/// Execute the disallowed subcommand.
///
/// Returns the number of violations found, capped at 255.
pub fn run_disallowed(
    args: &DisallowedArgs,
    config: &CheckerConfig,
    opts: OutputOptions,
) -> Result<u8> {
    let dirs = config.dirs_or(&args.dirs);
    if dirs.is_empty() {
        bail!("no directories to check; pass DIR arguments or set `dirs` in the config file");
    }

    let keys: Vec<&str> = config
        .disallowed_keys
        .iter()
        .chain(&args.disallowed_keys)
        .map(String::as_str)
        .collect();
    let values: Vec<&str> = config
        .disallowed_values
        .iter()
        .chain(&args.disallowed_values)
        .map(String::as_str)
        .collect();

    let rules = RuleSet::parse(&keys, &values)
        .context("set up --disallowed-keys and/or --disallowed-values first")?;
    tracing::info!(
        keys = rules.keys.len(),
        values = rules.values.len(),
        "parsed disallowed rules"
    );

    let report = run_rule_check(&dirs, &rules).context("rule check failed")?;
    print_check_report(&report, opts)?;

    Ok(exit_code(report.violation_count))
}
