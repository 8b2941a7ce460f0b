//! # Check Subcommand
//!
//! Checks one or more documents against a typeset file. For every input a
//! passing document prints its minimum viable value, a failing one prints
//! where it failed and what was expected there.
//!
//! Exit code: 0 when every input passes, 1 when any input fails. Unreadable
//! files and invalid typesets are operational errors.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rtv_core::{print_typeset, CheckOptions, RtvError, Typeset, Value, Verdict};
use serde_json::json;

use crate::document::{load_document, load_typeset};

/// Arguments for the `rtv check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Typeset file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub typeset: PathBuf,

    /// Documents to check (JSON or YAML).
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Reject object properties that shapes do not declare.
    #[arg(long)]
    pub exact_shapes: bool,

    /// Print one JSON report per input instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let typeset = load_typeset(&args.typeset)?;
    let options = CheckOptions {
        exact_shapes: args.exact_shapes,
    };

    let mut failed = 0usize;
    for input in &args.inputs {
        let verdict = check_file(input, &typeset, options)?;
        if !verdict.is_valid() {
            failed += 1;
        }
        if args.json {
            println!("{}", report_json(input, &verdict));
        } else {
            print_report(input, &verdict);
        }
    }

    tracing::info!(
        total = args.inputs.len(),
        failed,
        "checked documents"
    );
    Ok(if failed > 0 { 1 } else { 0 })
}

/// Checks one document file.
pub fn check_file(path: &Path, typeset: &Typeset, options: CheckOptions) -> Result<Verdict> {
    let value = Value::from(load_document(path)?);
    rtv_check::check_with_options(&value, typeset, options)
        .with_context(|| format!("cannot check {}", path.display()))
}

fn print_report(input: &Path, verdict: &Verdict) {
    match verdict {
        Verdict::Success(success) => {
            println!("PASS: {}", input.display());
            println!("{}", success.mvv.to_json());
        }
        Verdict::Error(err) => {
            println!("FAIL: {}", input.display());
            println!("  path:     /{}", err.path.join("/"));
            println!("  mismatch: {}", print_typeset(&err.mismatch));
            if let Some(cause) = &err.root_cause {
                println!("  cause:    {cause}");
            }
        }
    }
}

/// The machine-readable report for one input.
pub fn report_json(input: &Path, verdict: &Verdict) -> serde_json::Value {
    match verdict {
        Verdict::Success(success) => json!({
            "input": input.display().to_string(),
            "valid": true,
            "mvv": success.mvv.to_json(),
        }),
        Verdict::Error(err) => error_json(input, err),
    }
}

fn error_json(input: &Path, err: &RtvError) -> serde_json::Value {
    json!({
        "input": input.display().to_string(),
        "valid": false,
        "path": err.path,
        "mismatch": err.mismatch.to_json(),
        "rootCause": err.root_cause.as_ref().map(ToString::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_run_check_passes_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let typeset = write(dir.path(), "ts.json", r#"{"id": "int", "name": "string"}"#);
        let good = write(dir.path(), "good.json", r#"{"id": 1, "name": "a", "x": 0}"#);
        let bad = write(dir.path(), "bad.yaml", "id: 1.5\nname: a\n");

        let args = CheckArgs {
            typeset: typeset.clone(),
            inputs: vec![good.clone()],
            exact_shapes: false,
            json: false,
        };
        assert_eq!(run_check(&args).unwrap(), 0);

        let args = CheckArgs {
            typeset,
            inputs: vec![good, bad],
            exact_shapes: false,
            json: true,
        };
        assert_eq!(run_check(&args).unwrap(), 1);
    }

    #[test]
    fn test_exact_shapes_flag() {
        let dir = tempfile::tempdir().unwrap();
        let typeset = write(dir.path(), "ts.json", r#"{"id": "int"}"#);
        let doc = write(dir.path(), "doc.json", r#"{"id": 1, "x": 0}"#);
        let typeset = load_typeset(&typeset).unwrap();

        let lenient = check_file(&doc, &typeset, CheckOptions::default()).unwrap();
        assert_eq!(lenient.mvv().unwrap().to_json(), json!({"id": 1}));

        let strict = check_file(&doc, &typeset, CheckOptions { exact_shapes: true }).unwrap();
        let report = report_json(&doc, &strict);
        assert_eq!(report["valid"], json!(false));
        assert_eq!(
            report["rootCause"],
            json!("Found unexpected properties in value: 'x'")
        );
    }

    #[test]
    fn test_report_json_for_failure() {
        let dir = tempfile::tempdir().unwrap();
        let typeset = write(dir.path(), "ts.json", r#"{"tags": [["string"]]}"#);
        let doc = write(dir.path(), "doc.json", r#"{"tags": ["a", 2]}"#);
        let typeset = load_typeset(&typeset).unwrap();

        let verdict = check_file(&doc, &typeset, CheckOptions::default()).unwrap();
        let report = report_json(&doc, &verdict);
        assert_eq!(report["path"], json!(["tags", "1"]));
        assert_eq!(report["mismatch"], json!(["!", "string"]));
        assert_eq!(report["rootCause"], serde_json::Value::Null);
    }

    #[test]
    fn test_missing_input_is_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let typeset = write(dir.path(), "ts.json", r#""string""#);
        let args = CheckArgs {
            typeset,
            inputs: vec![dir.path().join("missing.json")],
            exact_shapes: false,
            json: false,
        };
        assert!(run_check(&args).is_err());
    }
}
