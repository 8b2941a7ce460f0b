//! # Lint Subcommand
//!
//! Validates a typeset file against the full (deep) grammar and reports
//! constructs that are valid but probably not what the author meant.
//!
//! Exit code: 0 when the typeset is valid (warnings included), 1 when it is
//! not a typeset.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rtv_core::{lint, validate_typeset, GrammarOptions, LintWarning, Typeset};

use crate::document::load_document;

/// Arguments for the `rtv lint` subcommand.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Typeset file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub typeset: PathBuf,

    /// Also require the fully-qualified form.
    #[arg(long)]
    pub fully_qualified: bool,
}

/// Outcome of linting one typeset document.
#[derive(Debug)]
pub enum LintOutcome {
    /// The document is a typeset; it may still carry warnings.
    Valid(Vec<LintWarning>),
    /// The document is not a typeset.
    Invalid(String),
}

/// Execute the lint subcommand.
pub fn run_lint(args: &LintArgs) -> Result<u8> {
    let doc = load_document(&args.typeset)?;
    match lint_document(&doc, args.fully_qualified) {
        LintOutcome::Valid(warnings) => {
            for warning in &warnings {
                println!("WARN: {warning}");
            }
            println!(
                "OK: {} ({} warning(s))",
                args.typeset.display(),
                warnings.len()
            );
            Ok(0)
        }
        LintOutcome::Invalid(reason) => {
            println!("INVALID: {}: {reason}", args.typeset.display());
            Ok(1)
        }
    }
}

/// Classifies `doc` and checks it against the deep grammar.
pub fn lint_document(doc: &serde_json::Value, fully_qualified: bool) -> LintOutcome {
    let typeset = match Typeset::from_json(doc) {
        Ok(ts) => ts,
        Err(err) => return LintOutcome::Invalid(err.to_string()),
    };
    let options = if fully_qualified {
        GrammarOptions::deep().fully_qualified()
    } else {
        GrammarOptions::deep()
    };
    match validate_typeset(&typeset, options) {
        Ok(()) => LintOutcome::Valid(lint(&typeset)),
        Err(reason) => LintOutcome::Invalid(reason.to_string()),
    }
}
