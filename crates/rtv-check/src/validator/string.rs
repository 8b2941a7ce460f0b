//! STRING validator.
//!
//! Arguments apply in a fixed precedence: `oneOf`, then `exp` (with
//! `expFlags`), then the `min`/`max` length bounds followed by `partial`.
//! Lengths count UTF-16 code units.

use rtv_core::{Context, Qualifier, TypeArgs, TypeName, TypesetError, Value, Verdict};
use serde_json::Value as Json;

use super::{compile_pattern, mismatch, within_bounds, TypeValidator};
use crate::engine::Engine;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringValidator;

impl TypeValidator for StringValidator {
    fn type_name(&self) -> TypeName {
        TypeName::String
    }

    fn validate<'a>(
        &self,
        _engine: &Engine,
        value: &'a Value,
        qualifier: Qualifier,
        args: Option<&TypeArgs>,
        _context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        if qualifier.permits(value) {
            return Ok(Verdict::success(value.clone()));
        }

        let valid = match value.as_str() {
            Some(s) => match args {
                Some(args) => matches_args(s, qualifier, args)?,
                None => qualifier != Qualifier::Required || !s.is_empty(),
            },
            None => false,
        };

        if valid {
            Ok(Verdict::success(value.clone()))
        } else {
            Ok(mismatch(value, TypeName::String, qualifier, args)?.into())
        }
    }
}

fn matches_args(s: &str, qualifier: Qualifier, args: &TypeArgs) -> Result<bool, TypesetError> {
    if let Some(candidates) = one_of(args) {
        return Ok(candidates.contains(&s));
    }

    if let Some(exp) = args.non_empty_string("exp") {
        let flags = args.non_empty_string("expFlags");
        return Ok(compile_pattern(exp, flags)?.is_match(s));
    }

    let max = args.number("max").filter(|n| n.is_finite());
    let min = args.count("min").unwrap_or(
        if qualifier == Qualifier::Required && max != Some(0.0) {
            1.0
        } else {
            0.0
        },
    );
    // a negative max means unlimited
    let max = max.filter(|n| *n >= 0.0);
    let len = s.encode_utf16().count() as f64;
    if !within_bounds(len, Some(min), max) {
        return Ok(false);
    }

    Ok(args
        .non_empty_string("partial")
        .map_or(true, |partial| s.contains(partial)))
}

/// The `oneOf` candidates: a single string, or the strings of a non-empty
/// list.
fn one_of(args: &TypeArgs) -> Option<Vec<&str>> {
    match args.data("oneOf")? {
        Json::String(s) => Some(vec![s.as_str()]),
        Json::Array(items) if !items.is_empty() => {
            Some(items.iter().filter_map(Json::as_str).collect())
        }
        _ => None,
    }
}
