//! # rtv-cli — Runtime Type Verification from the Command Line
//!
//! Provides the `rtv` command-line interface over `rtv-core` and
//! `rtv-check`. Typesets and documents are read from JSON or YAML files.
//!
//! ## Subcommands
//!
//! - `rtv check` — Check documents against a typeset.
//! - `rtv lint` — Validate a typeset's grammar and report suspicious constructs.
//! - `rtv normalize` — Print a typeset's fully-qualified form.
//!
//! ```bash
//! rtv check --typeset user.typeset.yaml users/*.json
//! rtv check --typeset user.typeset.yaml --exact-shapes --json new-user.json
//! rtv lint --typeset user.typeset.yaml
//! rtv normalize --typeset user.typeset.yaml --qualifier '?'
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers return an exit code; operational failures are `anyhow` errors.
//! - No checking logic here; handlers delegate to `rtv-check`.

pub mod check;
pub mod document;
pub mod lint;
pub mod normalize;
