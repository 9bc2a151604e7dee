//! # Report Output
//!
//! Text output is gated by the `-v` count:
//!
//! | level  | shown                                                   |
//! |--------|---------------------------------------------------------|
//! | 0      | `Errors found: N`                                       |
//! | 1      | per-file details: rules matched, error message and file |
//! | 2+     | the numbered source excerpt, or the raw content         |
//!
//! With `--json` the whole report is printed as pretty JSON instead.

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use neonchk_core::{CheckReport, ValidateFailure, ValidateReport};

/// Selected output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Number of `-v` flags.
    pub verbosity: u8,
    /// Print JSON instead of text.
    pub json: bool,
}

impl OutputOptions {
    fn verbose(&self) -> bool {
        self.verbosity >= 1
    }

    fn very_verbose(&self) -> bool {
        self.verbosity >= 2
    }
}

/// Print a rule-check report to stdout.
pub fn print_check_report(report: &CheckReport, opts: OutputOptions) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if opts.json {
        write_json(&mut stdout, report)
    } else {
        write_check_report(&mut stdout, report, opts).context("failed to write report")
    }
}

/// Print a validate report to stdout.
pub fn print_validate_report(report: &ValidateReport, opts: OutputOptions) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if opts.json {
        write_json(&mut stdout, report)
    } else {
        write_validate_report(&mut stdout, report, opts).context("failed to write report")
    }
}

fn write_json<T: Serialize>(w: &mut impl Write, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report).context("failed to serialize report")?;
    writeln!(w).context("failed to write report")?;
    Ok(())
}

/// Write the text form of a rule-check report.
pub fn write_check_report(
    out: &mut impl Write,
    report: &CheckReport,
    opts: OutputOptions,
) -> io::Result<()> {
    writeln!(out, "Errors found: {}", report.violation_count)?;
    if !opts.verbose() {
        return Ok(());
    }

    for file in &report.files {
        writeln!(out)?;
        writeln!(out, "File {}", file.file.display())?;
        if !file.keys.is_empty() {
            writeln!(out, "contains these disallowed keys:")?;
            for rule in &file.keys {
                writeln!(out, "- {rule}")?;
            }
        }
        if !file.values.is_empty() {
            writeln!(out, "contains these disallowed values:")?;
            for rule in &file.values {
                writeln!(out, "- {rule}")?;
            }
        }
    }

    for skipped in &report.skipped {
        writeln!(out)?;
        writeln!(
            out,
            "Skipped {} (does not decode): {}",
            skipped.file.display(),
            skipped.message
        )?;
    }
    Ok(())
}

/// Write the text form of a validate report.
pub fn write_validate_report(
    out: &mut impl Write,
    report: &ValidateReport,
    opts: OutputOptions,
) -> io::Result<()> {
    writeln!(out, "Errors found: {}", report.failure_count())?;
    writeln!(out)?;
    if !opts.verbose() {
        return Ok(());
    }

    for failure in &report.failures {
        writeln!(out, "Error: {}", failure.message())?;
        match failure.line() {
            Some(line) => writeln!(out, "File: {}:{line}", failure.file().display())?,
            None => writeln!(out, "File: {}", failure.file().display())?,
        }

        if opts.very_verbose() {
            match failure {
                ValidateFailure::Parse(parse) => {
                    writeln!(out)?;
                    writeln!(out, "Content:")?;
                    let excerpt = parse.excerpt();
                    write!(out, "{excerpt}")?;
                    if !excerpt.ends_with('\n') {
                        writeln!(out)?;
                    }
                }
                ValidateFailure::NonScalar(violation) => {
                    writeln!(out)?;
                    writeln!(out, "Content (re-encoded from the decoded value):")?;
                    writeln!(out, "{}", violation.value)?;
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
