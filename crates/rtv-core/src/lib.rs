//! # rtv-core — The Typeset Language
//!
//! This crate defines the language of runtime type verification: the values
//! that get checked, and the typesets that describe what a value may be.
//! It contains no checking logic; the engine and the type validators live in
//! `rtv-check`, which depends on this crate.
//!
//! ## Key Design Principles
//!
//! 1. **Typesets are a closed sum type.** [`Typeset`] has exactly four forms
//!    (type, validator, shape, list), and list elements are [`Rule`]s. JSON
//!    documents are classified into this model once, at the boundary, so no
//!    later stage ever inspects a raw JSON value to decide what it means.
//!
//! 2. **Grammar is checked, not assumed.** [`grammar::validate_typeset`]
//!    enforces the list rules, shallow or deep, and optionally the
//!    fully-qualified form. Every operation that relies on a well-formed
//!    typeset validates it first and reports [`TypesetError`].
//!
//! 3. **Normalization never mutates.** [`normalize::fully_qualify`] and
//!    [`normalize::Subtypes`] work on borrowed typesets and produce new ones.
//!
//! 4. **Data failures are values.** A value that does not match is a
//!    [`Verdict::Error`] carrying an [`RtvError`]. Only programmer errors
//!    are returned as `Err`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rtv-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod args;
pub mod context;
pub mod error;
pub mod grammar;
pub mod normalize;
pub mod predicate;
pub mod print;
pub mod qualifier;
pub mod result;
pub mod types;
pub mod typeset;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use args::{ArgValue, TypeArgs};
pub use context::{CheckOptions, Context, ParentKey};
pub use error::{Expecting, GrammarError, TypesetError};
pub use grammar::{
    is_typeset, is_typeset_json, lint, validate_typeset, verify_typeset, GrammarOptions,
    LintWarning,
};
pub use normalize::{
    extract_next_type, fully_qualify, fully_qualify_verified, get_qualifier, to_typeset,
    QualifierMode, Subtypes,
};
pub use print::{print_typeset, print_value};
pub use qualifier::Qualifier;
pub use result::{Failure, RtvError, RtvSuccess, Verdict};
pub use types::TypeName;
pub use typeset::{CustomValidator, Rule, Shape, Typeset};
pub use value::{ErrorValue, FunctionValue, Object, RegExpValue, Value};
