//! # Leaf Predicates
//!
//! One pure test per type: does this value have the type at all? Type
//! arguments and qualifiers are the validators' business, not these.

use crate::types::TypeName;
use crate::value::Value;

/// Largest integer `n` such that `n` and `n + 1` are both exactly
/// representable as `f64`.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn is_any(_: &Value) -> bool {
    true
}

pub fn is_null(v: &Value) -> bool {
    matches!(v, Value::Null)
}

pub fn is_string(v: &Value) -> bool {
    matches!(v, Value::String(_))
}

pub fn is_boolean(v: &Value) -> bool {
    matches!(v, Value::Bool(_))
}

/// Any number except `NaN`; the infinities are numbers.
pub fn is_number(v: &Value) -> bool {
    matches!(v, Value::Number(n) if !n.is_nan())
}

pub fn is_finite(v: &Value) -> bool {
    matches!(v, Value::Number(n) if n.is_finite())
}

pub fn is_int(v: &Value) -> bool {
    matches!(v, Value::Number(n) if is_integral(*n))
}

pub fn is_safe_int(v: &Value) -> bool {
    matches!(v, Value::Number(n) if is_integral(*n) && n.abs() <= MAX_SAFE_INTEGER)
}

/// Zero, or a finite number with a fractional part.
pub fn is_float(v: &Value) -> bool {
    matches!(v, Value::Number(n) if *n == 0.0 || (n.is_finite() && !is_integral(*n)))
}

pub fn is_function(v: &Value) -> bool {
    matches!(v, Value::Function(_))
}

pub fn is_regexp(v: &Value) -> bool {
    matches!(v, Value::RegExp(_))
}

pub fn is_date(v: &Value) -> bool {
    matches!(v, Value::Date(_))
}

pub fn is_error(v: &Value) -> bool {
    matches!(v, Value::Error(_))
}

pub fn is_array(v: &Value) -> bool {
    matches!(v, Value::Array(_))
}

/// Anything that is not a primitive.
pub fn is_any_object(v: &Value) -> bool {
    !matches!(
        v,
        Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// An object that is neither an array, a collection nor another built-in.
pub fn is_object(v: &Value) -> bool {
    matches!(v, Value::Object(_))
}

pub fn is_plain_object(v: &Value) -> bool {
    matches!(v, Value::Object(o) if o.is_plain())
}

pub fn is_class_object(v: &Value) -> bool {
    matches!(v, Value::Object(o) if !o.is_plain())
}

pub fn is_hash_map(v: &Value) -> bool {
    is_object(v)
}

pub fn is_map(v: &Value) -> bool {
    matches!(v, Value::Map(_))
}

pub fn is_set(v: &Value) -> bool {
    matches!(v, Value::Set(_))
}

/// A JSON-compatible value, checked one level deep: `null`, a string, a
/// boolean, a finite number, a plain object or an array.
pub fn is_json(v: &Value) -> bool {
    is_null(v) || is_string(v) || is_boolean(v) || is_finite(v) || is_plain_object(v) || is_array(v)
}

/// The predicate for `type_name`.
pub fn predicate_for(type_name: TypeName) -> fn(&Value) -> bool {
    match type_name {
        TypeName::Any => is_any,
        TypeName::Null => is_null,
        TypeName::String => is_string,
        TypeName::Boolean => is_boolean,
        TypeName::Number => is_number,
        TypeName::Finite => is_finite,
        TypeName::Int => is_int,
        TypeName::SafeInt => is_safe_int,
        TypeName::Float => is_float,
        TypeName::Function => is_function,
        TypeName::RegExp => is_regexp,
        TypeName::Date => is_date,
        TypeName::Error => is_error,
        TypeName::Array => is_array,
        TypeName::AnyObject => is_any_object,
        TypeName::Object => is_object,
        TypeName::PlainObject => is_plain_object,
        TypeName::ClassObject => is_class_object,
        TypeName::HashMap => is_hash_map,
        TypeName::Map => is_map,
        TypeName::Set => is_set,
        TypeName::Json => is_json,
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn test_number_family() {
        let inf = Value::Number(f64::INFINITY);
        let nan = Value::Number(f64::NAN);
        assert!(is_number(&inf));
        assert!(!is_number(&nan));
        assert!(!is_finite(&inf));
        assert!(is_int(&Value::from(-3)));
        assert!(!is_int(&Value::from(1.5)));
        assert!(is_safe_int(&Value::Number(MAX_SAFE_INTEGER)));
        assert!(!is_safe_int(&Value::Number(MAX_SAFE_INTEGER + 2.0)));
        assert!(is_float(&Value::from(0)));
        assert!(is_float(&Value::from(1.5)));
        assert!(!is_float(&Value::from(2)));
        assert!(!is_float(&inf));
    }

    #[test]
    fn test_object_family() {
        let plain = Value::Object(Object::new());
        let instance = Value::Object(Object::instance_of("Point"));
        let arr = Value::array([1]);
        assert!(is_object(&plain) && is_object(&instance));
        assert!(is_plain_object(&plain) && !is_plain_object(&instance));
        assert!(is_class_object(&instance) && !is_class_object(&plain));
        assert!(!is_object(&arr));
        assert!(is_any_object(&arr));
        assert!(is_any_object(&Value::map([("k", 1)])));
        assert!(!is_any_object(&Value::from("s")));
    }

    #[test]
    fn test_json_is_shallow() {
        assert!(is_json(&Value::Null));
        assert!(is_json(&Value::array([Value::Undefined])));
        assert!(!is_json(&Value::Undefined));
        assert!(!is_json(&Value::Number(f64::NAN)));
        assert!(!is_json(&Value::Object(Object::instance_of("Point"))));
    }

    #[test]
    fn test_predicate_for_covers_every_type() {
        for t in TypeName::all() {
            // ANY accepts undefined; nothing else does
            let accepts_undefined = predicate_for(*t)(&Value::Undefined);
            assert_eq!(accepts_undefined, *t == TypeName::Any, "{t}");
        }
    }
}
