//! # Type Validators
//!
//! One validator per type. Every validator follows the same contract:
//!
//! 1. If the qualifier permits the value as absent (`null`, `undefined`, or
//!    any falsy value under TRUTHY), succeed immediately with the value as
//!    its own minimum viable value.
//! 2. Otherwise apply the type's leaf predicate. On failure, report a
//!    mismatch against the type with its qualifier and arguments, at an
//!    empty path (the caller adds its own path segment).
//! 3. Otherwise apply the type's arguments in the type's fixed precedence
//!    order. Composite validators then recurse into the engine once per
//!    child, stop at the first failing child, and prepend the child's key to
//!    the failure path.
//!
//! Arguments of the wrong kind are ignored rather than rejected. Malformed
//! patterns are programmer errors.

pub mod array;
pub mod collection;
pub mod numeric;
pub mod object;
pub mod simple;
pub mod string;

use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use rtv_core::{
    is_typeset, print_value, to_typeset, Context, GrammarOptions, Qualifier, RtvError, TypeArgs,
    TypeName, Typeset, TypesetError, Value, Verdict,
};

use crate::engine::Engine;

pub use array::ArrayValidator;
pub use collection::{HashMapValidator, MapValidator, SetValidator};
pub use numeric::NumberValidator;
pub use object::ObjectValidator;
pub use simple::PredicateValidator;
pub use string::StringValidator;

/// A validator for one type.
pub trait TypeValidator: Send + Sync {
    /// The type this validator is registered for.
    fn type_name(&self) -> TypeName;

    /// Validates `value` as this type.
    ///
    /// `engine` is the engine running the check; composite validators use it
    /// to check child values. Returns `Err` only for programmer errors.
    fn validate<'a>(
        &self,
        engine: &Engine,
        value: &'a Value,
        qualifier: Qualifier,
        args: Option<&TypeArgs>,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError>;
}

/// Every standard validator, one per [`TypeName`].
pub fn standard_validators() -> Vec<Arc<dyn TypeValidator>> {
    let mut validators: Vec<Arc<dyn TypeValidator>> = Vec::with_capacity(TypeName::all().len());
    for type_name in [
        TypeName::Any,
        TypeName::Null,
        TypeName::Boolean,
        TypeName::Function,
        TypeName::RegExp,
        TypeName::Date,
        TypeName::Error,
        TypeName::Json,
    ] {
        validators.push(Arc::new(PredicateValidator::new(type_name)));
    }
    validators.push(Arc::new(StringValidator));
    for type_name in [
        TypeName::Number,
        TypeName::Finite,
        TypeName::Int,
        TypeName::SafeInt,
        TypeName::Float,
    ] {
        validators.push(Arc::new(NumberValidator::new(type_name)));
    }
    validators.push(Arc::new(ArrayValidator));
    for type_name in [
        TypeName::AnyObject,
        TypeName::Object,
        TypeName::PlainObject,
        TypeName::ClassObject,
    ] {
        validators.push(Arc::new(ObjectValidator::new(type_name)));
    }
    validators.push(Arc::new(HashMapValidator));
    validators.push(Arc::new(MapValidator));
    validators.push(Arc::new(SetValidator));
    validators
}

/// The failure of a value that is not `type_name`, or violates its
/// arguments.
pub(crate) fn mismatch(
    value: &Value,
    type_name: TypeName,
    qualifier: Qualifier,
    args: Option<&TypeArgs>,
) -> Result<RtvError, TypesetError> {
    mismatch_at(value, type_name, qualifier, args, Vec::new())
}

/// A mismatch located at `path` within `value`, such as a rejected key.
pub(crate) fn mismatch_at(
    value: &Value,
    type_name: TypeName,
    qualifier: Qualifier,
    args: Option<&TypeArgs>,
    path: Vec<String>,
) -> Result<RtvError, TypesetError> {
    Ok(RtvError::new(
        value.clone(),
        to_typeset(type_name, Some(qualifier), args, false)?,
        path,
        to_typeset(type_name, Some(qualifier), args, true)?,
    ))
}

/// Re-wraps the failure of a child found under `segment`.
pub(crate) fn child_failure(
    value: &Value,
    type_name: TypeName,
    qualifier: Qualifier,
    args: Option<&TypeArgs>,
    segment: String,
    child: &RtvError,
) -> Result<Verdict, TypesetError> {
    let typeset = to_typeset(type_name, Some(qualifier), args, false)?;
    Ok(child.rewrap(value.clone(), typeset, [segment]).into())
}

/// Path segment for a collection key: `key="name"`, `valueKey=3`.
pub(crate) fn key_segment(label: &str, key: &Value) -> String {
    format!("{label}={}", print_value(key))
}

/// Argument `key` if it holds a typeset that passes the shallow grammar.
/// Anything else means the argument is not given.
pub(crate) fn typeset_arg<'t>(args: &'t TypeArgs, key: &str) -> Option<&'t Typeset> {
    args.typeset(key)
        .filter(|ts| is_typeset(ts, GrammarOptions::shallow()))
}

/// Count-like argument semantics shared by ARRAY and STRING: `min` when it is
/// a finite number `>= 0`, `max` when it also is and is not below `min`.
pub(crate) fn within_bounds(len: f64, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_some_and(|min| len < min) {
        return false;
    }
    match max {
        Some(max) if min.map_or(true, |min| max >= min) => len <= max,
        _ => true,
    }
}

/// Compiles a pattern argument with JavaScript-style flags.
///
/// `i`, `m` and `s` map onto the regex engine's flags. `u` is the default,
/// `g` has no effect on a single test, and `y` anchors the match at the
/// start of the subject.
pub(crate) fn compile_pattern(pattern: &str, flags: Option<&str>) -> Result<Regex, TypesetError> {
    let flags = flags.unwrap_or_default();
    let mut sticky = false;
    let mut builder_flags = (false, false, false);
    for flag in flags.chars() {
        match flag {
            'i' => builder_flags.0 = true,
            'm' => builder_flags.1 = true,
            's' => builder_flags.2 = true,
            'y' => sticky = true,
            'u' | 'g' => {}
            _ => return Err(TypesetError::InvalidPatternFlags(flags.to_string())),
        }
    }

    let source = if sticky {
        format!(r"\A(?:{pattern})")
    } else {
        pattern.to_string()
    };
    RegexBuilder::new(&source)
        .case_insensitive(builder_flags.0)
        .multi_line(builder_flags.1)
        .dot_matches_new_line(builder_flags.2)
        .build()
        .map_err(|source| TypesetError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
