//! # Normalize Subcommand
//!
//! Prints the fully-qualified form of a typeset file as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rtv_core::{fully_qualify, Qualifier, Typeset};

use crate::document::load_typeset;

/// Arguments for the `rtv normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Typeset file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub typeset: PathBuf,

    /// Qualifier to impose instead of the typeset's own (`!`, `+`, `?` or `-`).
    #[arg(long, value_name = "QUALIFIER")]
    pub qualifier: Option<Qualifier>,

    /// Print on a single line.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the normalize subcommand.
pub fn run_normalize(args: &NormalizeArgs) -> Result<u8> {
    let typeset = load_typeset(&args.typeset)?;
    let normalized = normalize(&typeset, args.qualifier)?;
    let text = if args.compact {
        serde_json::to_string(&normalized)?
    } else {
        serde_json::to_string_pretty(&normalized)?
    };
    println!("{text}");
    Ok(0)
}

/// The fully-qualified form of `typeset` as JSON.
pub fn normalize(typeset: &Typeset, qualifier: Option<Qualifier>) -> Result<serde_json::Value> {
    let qualified = fully_qualify(typeset, qualifier)
        .with_context(|| format!("cannot normalize {typeset}"))?;
    Ok(qualified.to_json())
}
