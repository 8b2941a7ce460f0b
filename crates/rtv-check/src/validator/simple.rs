//! Validators for types that take no arguments: the value either satisfies
//! the type's predicate or it does not.

use rtv_core::predicate::predicate_for;
use rtv_core::{Context, Qualifier, TypeArgs, TypeName, TypesetError, Value, Verdict};

use super::{mismatch, TypeValidator};
use crate::engine::Engine;

/// Validator for an argument-free type.
#[derive(Debug, Clone, Copy)]
pub struct PredicateValidator {
    type_name: TypeName,
    predicate: fn(&Value) -> bool,
}

impl PredicateValidator {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            predicate: predicate_for(type_name),
        }
    }
}

impl TypeValidator for PredicateValidator {
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
        if qualifier.permits(value) || (self.predicate)(value) {
            return Ok(Verdict::success(value.clone()));
        }
        Ok(mismatch(value, self.type_name, qualifier, args)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtv_core::Typeset;

    fn check(type_name: TypeName, qualifier: Qualifier, value: &Value) -> Verdict {
        let engine = Engine::new();
        PredicateValidator::new(type_name)
            .validate(&engine, value, qualifier, None, &Context::root(value))
            .unwrap()
    }

    #[test]
    fn test_null_type() {
        assert!(check(TypeName::Null, Qualifier::Required, &Value::Null).is_valid());
        assert!(!check(TypeName::Null, Qualifier::Required, &Value::Undefined).is_valid());
        assert!(check(TypeName::Null, Qualifier::Optional, &Value::Undefined).is_valid());
    }

    #[test]
    fn test_any_accepts_undefined() {
        assert!(check(TypeName::Any, Qualifier::Required, &Value::Undefined).is_valid());
    }

    #[test]
    fn test_boolean_mismatch_reports_fully_qualified_type() {
        let verdict = check(TypeName::Boolean, Qualifier::Expected, &Value::from(1));
        let err = verdict.error().unwrap();
        assert!(err.path.is_empty());
        assert_eq!(
            err.typeset,
            Typeset::list([rtv_core::Rule::from(Qualifier::Expected), TypeName::Boolean.into()])
        );
        assert_eq!(err.mismatch, err.typeset);
    }

    #[test]
    fn test_truthy_permits_falsy_values() {
        for falsy in [Value::from(0), Value::from(""), Value::from(false), Value::Null] {
            let verdict = check(TypeName::Date, Qualifier::Truthy, &falsy);
            assert_eq!(verdict.mvv(), Some(&falsy));
        }
        assert!(!check(TypeName::Date, Qualifier::Truthy, &Value::from(1)).is_valid());
    }

    #[test]
    fn test_json_is_shallow() {
        let nested = Value::array([Value::function("f", |_| Value::Undefined)]);
        assert!(check(TypeName::Json, Qualifier::Required, &nested).is_valid());
        assert!(!check(TypeName::Json, Qualifier::Required, &Value::from(f64::NAN)).is_valid());
    }
}
