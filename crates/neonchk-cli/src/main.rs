//! # neon-checker CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use neonchk_cli::config::CheckerConfig;
use neonchk_cli::disallowed::{run_disallowed, DisallowedArgs};
use neonchk_cli::output::OutputOptions;
use neonchk_cli::validate::{run_validate, ValidateArgs};

/// Validate and audit NEON configuration files.
///
/// Reports files that fail to decode, with the failing line, and finds
/// disallowed keys and key/value combinations across directory trees.
#[derive(Parser, Debug)]
#[command(name = "neon-checker", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find disallowed keys and values in all *.neon files.
    Disallowed(DisallowedArgs),

    /// Decode all *.neon files and print the ones that fail.
    #[command(visible_alias = "check")]
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Reports go to stdout; keep diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("neon-checker v{} starting", env!("CARGO_PKG_VERSION"));

    let opts = OutputOptions {
        verbosity: cli.verbose,
        json: cli.json,
    };

    let result = CheckerConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Disallowed(args) => run_disallowed(&args, &config, opts),
        Commands::Validate(args) => run_validate(&args, &config, opts),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
