//! # CLI Integration Tests
//!
//! Runs the `rtv` binary against temporary typeset and document files and
//! checks exit codes and output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn rtv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rtv"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("rtv binary should run")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

const USER_TYPESET: &str = r#"
id: int
name:
  - string
  - min: 1
tags:
  - "?"
  - - string
"#;

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_prints_mvv_for_passing_document() {
    let dir = tempfile::tempdir().unwrap();
    let typeset = write(dir.path(), "user.yaml", USER_TYPESET);
    let doc = write(dir.path(), "user.json", r#"{"id": 7, "name": "ada", "extra": true}"#);

    let out = rtv(&["check", "--typeset", arg(&typeset), arg(&doc)]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("PASS"));
    assert!(stdout.contains(r#"{"id":7,"name":"ada"}"#));
}

#[test]
fn check_reports_failure_path_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let typeset = write(dir.path(), "user.yaml", USER_TYPESET);
    let doc = write(dir.path(), "user.json", r#"{"id": 7, "name": "ada", "tags": ["a", 1]}"#);

    let out = rtv(&["check", "--json", "--typeset", arg(&typeset), arg(&doc)]);
    assert_eq!(out.status.code(), Some(1));
    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("one JSON report");
    assert_eq!(report["valid"], serde_json::json!(false));
    assert_eq!(report["path"], serde_json::json!(["tags", "1"]));
    assert_eq!(report["mismatch"], serde_json::json!(["!", "string"]));
}

#[test]
fn check_exact_shapes_rejects_extra_properties() {
    let dir = tempfile::tempdir().unwrap();
    let typeset = write(dir.path(), "user.yaml", USER_TYPESET);
    let doc = write(dir.path(), "user.json", r#"{"id": 7, "name": "ada", "extra": true}"#);

    let out = rtv(&["check", "--exact-shapes", "--typeset", arg(&typeset), arg(&doc)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("unexpected properties"));
}

#[test]
fn check_with_invalid_typeset_is_operational_error() {
    let dir = tempfile::tempdir().unwrap();
    let typeset = write(dir.path(), "bad.json", r#"["string", "?"]"#);
    let doc = write(dir.path(), "doc.json", r#""x""#);

    let out = rtv(&["check", "--typeset", arg(&typeset), arg(&doc)]);
    assert_eq!(out.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// lint and normalize
// ---------------------------------------------------------------------------

#[test]
fn lint_warns_about_misplaced_shape() {
    let dir = tempfile::tempdir().unwrap();
    let typeset = write(dir.path(), "ts.json", r#"["string", {"$": {"a": "finite"}}]"#);

    let out = rtv(&["lint", "--typeset", arg(&typeset)]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("WARN"));
    assert!(stdout.contains("1 warning(s)"));
}

#[test]
fn normalize_prints_fully_qualified_typeset() {
    let dir = tempfile::tempdir().unwrap();
    let typeset = write(dir.path(), "ts.json", r#"{"a": "finite"}"#);

    let out = rtv(&["normalize", "--compact", "--typeset", arg(&typeset)]);
    assert_eq!(out.status.code(), Some(0));
    let normalized: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        normalized,
        serde_json::json!(["!", "object", {"$": {"a": "finite"}}])
    );
}
