//! Validators for the numeric types: NUMBER, FINITE, INT, SAFE_INT and
//! FLOAT.
//!
//! `oneOf` takes precedence over `min`/`max`. Each argument only counts when
//! its own value is within the range of the type being checked, so
//! `[INT, {min: 1.5}]` has no minimum.

use rtv_core::predicate::predicate_for;
use rtv_core::{Context, Qualifier, TypeArgs, TypeName, TypesetError, Value, Verdict};
use serde_json::Value as Json;

use super::{mismatch, TypeValidator};
use crate::engine::Engine;

#[derive(Debug, Clone, Copy)]
pub struct NumberValidator {
    type_name: TypeName,
    predicate: fn(&Value) -> bool,
}

impl NumberValidator {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            predicate: predicate_for(type_name),
        }
    }

    /// Whether `n` is within the range of this validator's type.
    fn in_range(&self, n: f64) -> bool {
        (self.predicate)(&Value::Number(n))
    }

    fn matches_args(&self, n: f64, args: &TypeArgs) -> bool {
        let candidates = match args.data("oneOf") {
            Some(Json::Array(items)) if !items.is_empty() => Some(
                items
                    .iter()
                    .filter_map(Json::as_f64)
                    .filter(|c| self.in_range(*c))
                    .collect::<Vec<_>>(),
            ),
            Some(item) => item.as_f64().filter(|c| self.in_range(*c)).map(|c| vec![c]),
            None => None,
        };
        if let Some(candidates) = candidates {
            return candidates.contains(&n);
        }

        let min = args.number("min").filter(|m| self.in_range(*m));
        let max = args
            .number("max")
            .filter(|m| self.in_range(*m))
            .filter(|m| min.map_or(true, |min| *m >= min));
        min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max)
    }
}

impl TypeValidator for NumberValidator {
    fn type_name(&self) -> TypeName {
        self.type_name
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

        let valid = match value.as_f64() {
            Some(n) if (self.predicate)(value) => args.map_or(true, |args| self.matches_args(n, args)),
            _ => false,
        };

        if valid {
            Ok(Verdict::success(value.clone()))
        } else {
            Ok(mismatch(value, self.type_name, qualifier, args)?.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid(type_name: TypeName, args: Option<serde_json::Value>, value: Value) -> bool {
        let args = args.map(|a| TypeArgs::from_json(a.as_object().unwrap()).unwrap());
        NumberValidator::new(type_name)
            .validate(
                &Engine::new(),
                &value,
                Qualifier::Required,
                args.as_ref(),
                &Context::root(&value),
            )
            .unwrap()
            .is_valid()
    }

    #[test]
    fn test_type_predicates() {
        assert!(valid(TypeName::Number, None, Value::from(f64::INFINITY)));
        assert!(!valid(TypeName::Number, None, Value::from(f64::NAN)));
        assert!(!valid(TypeName::Finite, None, Value::from(f64::INFINITY)));
        assert!(valid(TypeName::Int, None, Value::from(-3)));
        assert!(!valid(TypeName::Int, None, Value::from(1.5)));
        assert!(!valid(TypeName::SafeInt, None, Value::from(2f64.powi(53))));
        assert!(valid(TypeName::Float, None, Value::from(1.5)));
        assert!(valid(TypeName::Float, None, Value::from(0)));
        assert!(!valid(TypeName::Float, None, Value::from(2)));
        assert!(!valid(TypeName::Number, None, Value::from("1")));
    }

    #[test]
    fn test_one_of() {
        let args = json!({"oneOf": [1, 2, "3"]});
        assert!(valid(TypeName::Int, Some(args.clone()), Value::from(2)));
        assert!(!valid(TypeName::Int, Some(args), Value::from(3)));
        assert!(valid(TypeName::Finite, Some(json!({"oneOf": 7})), Value::from(7)));
        assert!(!valid(TypeName::Finite, Some(json!({"oneOf": 7})), Value::from(8)));
    }

    #[test]
    fn test_one_of_ignores_out_of_range_candidates() {
        // 1.5 is not an INT, so the list holds no usable candidate
        assert!(!valid(TypeName::Int, Some(json!({"oneOf": [1.5]})), Value::from(1)));
        // a lone out-of-range candidate means no oneOf at all
        assert!(valid(TypeName::Int, Some(json!({"oneOf": 1.5})), Value::from(1)));
    }

    #[test]
    fn test_one_of_takes_precedence_over_bounds() {
        let args = json!({"oneOf": [10], "max": 5});
        assert!(valid(TypeName::Number, Some(args), Value::from(10)));
    }

    #[test]
    fn test_min_max() {
        let args = json!({"min": 1, "max": 5});
        assert!(valid(TypeName::Finite, Some(args.clone()), Value::from(1)));
        assert!(valid(TypeName::Finite, Some(args.clone()), Value::from(5)));
        assert!(!valid(TypeName::Finite, Some(args.clone()), Value::from(0)));
        assert!(!valid(TypeName::Finite, Some(args), Value::from(6)));
    }

    #[test]
    fn test_bounds_outside_type_range_are_ignored() {
        assert!(valid(TypeName::Int, Some(json!({"min": 1.5})), Value::from(1)));
        assert!(valid(TypeName::Int, Some(json!({"max": 0, "min": 5})), Value::from(9)));
        assert!(!valid(TypeName::Int, Some(json!({"max": 0, "min": 5})), Value::from(1)));
    }
}
