//! # rtv CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rtv_cli::check::{run_check, CheckArgs};
use rtv_cli::lint::{run_lint, LintArgs};
use rtv_cli::normalize::{run_normalize, NormalizeArgs};

/// Runtime type verification for JSON and YAML documents.
///
/// Checks documents against typesets, reporting the minimum viable value of
/// each passing document and the exact location of each failure.
#[derive(Parser, Debug)]
#[command(name = "rtv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Without it, `RUST_LOG` decides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check documents against a typeset.
    Check(CheckArgs),

    /// Validate a typeset's grammar and report suspicious constructs.
    Lint(LintArgs),

    /// Print the fully-qualified form of a typeset.
    Normalize(NormalizeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Lint(args) => run_lint(&args),
        Commands::Normalize(args) => run_normalize(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
