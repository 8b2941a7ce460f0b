//! # Facade
//!
//! Free functions over a shared standard engine, for callers that never
//! register validators of their own.

use once_cell::sync::Lazy;
use rtv_core::{CheckOptions, Typeset, TypesetError, Value, Verdict};

use crate::engine::Engine;
use crate::error::VerifyError;

static STANDARD: Lazy<Engine> = Lazy::new(|| {
    tracing::debug!("building standard engine");
    Engine::standard()
});

/// The shared engine with every standard validator registered.
pub fn standard_engine() -> &'static Engine {
    &STANDARD
}

/// Checks `value` against `typeset` with the standard engine.
pub fn check(value: &Value, typeset: &Typeset) -> Result<Verdict, TypesetError> {
    STANDARD.check(value, typeset)
}

/// [`check`] with explicit options.
pub fn check_with_options(
    value: &Value,
    typeset: &Typeset,
    options: CheckOptions,
) -> Result<Verdict, TypesetError> {
    STANDARD.check_with_options(value, typeset, options)
}

/// Verifies `value` against `typeset` with the standard engine, returning its
/// minimum viable value.
pub fn verify(value: &Value, typeset: &Typeset) -> Result<Value, VerifyError> {
    STANDARD.verify(value, typeset)
}
