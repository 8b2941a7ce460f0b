//! # rtv-check — Matching Engine and Type Validators
//!
//! Checks dynamic values against typesets. Given a value and a typeset from
//! `rtv-core`, the [`Engine`] decides whether the value complies and
//! returns either its minimum viable value or an error that pinpoints the
//! failing location.
//!
//! ## Key Design Principles
//!
//! 1. **Explicit registry.** Validators are registered on an [`Engine`]
//!    value, never through module-level state. [`Engine::standard`] is the
//!    single initialization pass for the standard set.
//!
//! 2. **Validators borrow the engine.** Composite validators recurse through
//!    the `&Engine` they are handed, which removes the cycle between the
//!    engine and the validators that need it.
//!
//! 3. **First match wins.** Alternatives are tried left to right and
//!    children are checked in order; both stop at the first decisive result.
//!
//! 4. **Values are never mutated.** The minimum viable value is built fresh
//!    from the children's own minimum viable values.
//!
//! ## Crate Policy
//!
//! - Depends only on `rtv-core` within the workspace.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod engine;
pub mod error;
pub mod facade;
pub mod validator;

// Re-export primary types for ergonomic imports.
pub use engine::Engine;
pub use error::VerifyError;
pub use facade::{check, check_with_options, standard_engine, verify};
pub use validator::{standard_validators, TypeValidator};
