//! # Value Model
//!
//! The dynamic values that typesets are checked against. The model mirrors
//! the kinds of values found at trust boundaries of a dynamically typed
//! system: the JSON kinds plus `undefined`, keyed collections, sets, dates,
//! regular expressions, errors, functions and class instances.
//!
//! ## Design
//!
//! - Values are owned trees. A container owns its children, so a value can
//!   never reference itself and checking always terminates.
//! - Object properties and collection entries keep insertion order
//!   (`indexmap`), because property order is observable in minimum viable
//!   values and in error paths.
//! - Conversion from `serde_json::Value` is lossless (objects become plain
//!   objects). Conversion back to JSON is lossy for the non-JSON kinds.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use regex::Regex;

/// A dynamic value under verification.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An absent value.
    Undefined,
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number (IEEE 754 double, including `NaN` and the infinities).
    Number(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// An object with ordered own properties, optionally a class instance.
    Object(Object),
    /// A keyed collection with arbitrary keys, in insertion order.
    Map(Vec<(Value, Value)>),
    /// A collection of unique values, in insertion order.
    Set(Vec<Value>),
    /// A point in time.
    Date(DateTime<Utc>),
    /// A regular expression.
    RegExp(RegExpValue),
    /// An error value.
    Error(ErrorValue),
    /// A callable value.
    Function(FunctionValue),
}

/// An object: own properties plus an optional class name.
///
/// An object without a class is a *plain* object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    /// Name of the class this object is an instance of, if any.
    pub class: Option<String>,
    /// Own enumerable properties, in insertion order.
    pub props: IndexMap<String, Value>,
}

impl Object {
    /// An empty plain object.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty instance of the class `name`.
    pub fn instance_of(name: impl Into<String>) -> Self {
        Self {
            class: Some(name.into()),
            props: IndexMap::new(),
        }
    }

    /// Whether this object has no class.
    pub fn is_plain(&self) -> bool {
        self.class.is_none()
    }

    /// Own property `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Sets own property `key`, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            class: None,
            props: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A regular expression value. Two expressions are equal when their
/// patterns are.
#[derive(Clone)]
pub struct RegExpValue(Regex);

impl RegExpValue {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// The compiled expression.
    pub fn regex(&self) -> &Regex {
        &self.0
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for RegExpValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl std::fmt::Debug for RegExpValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

/// An error value: a name (such as `TypeError`) and a message.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    /// The error's name.
    pub name: String,
    /// The error's message.
    pub message: String,
}

type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A callable value. Two functions are equal only if they are the same
/// function.
#[derive(Clone)]
pub struct FunctionValue {
    name: String,
    call: Arc<NativeFn>,
}

impl FunctionValue {
    /// Wraps `f` as a function value called `name`.
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            call: Arc::new(f),
        }
    }

    /// The function's name (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the function.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.call)(args)
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}

impl std::fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionValue({})", self.name)
    }
}

impl Value {
    /// Builds a plain object from key/value pairs.
    pub fn object<K, V>(props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(props.into_iter().collect())
    }

    /// Builds a map from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a set, dropping duplicate elements.
    pub fn set<V: Into<Value>>(elems: impl IntoIterator<Item = V>) -> Self {
        let mut out: Vec<Value> = Vec::new();
        for elem in elems {
            let elem = elem.into();
            if !out.contains(&elem) {
                out.push(elem);
            }
        }
        Value::Set(out)
    }

    /// Builds an array.
    pub fn array<V: Into<Value>>(elems: impl IntoIterator<Item = V>) -> Self {
        Value::Array(elems.into_iter().map(Into::into).collect())
    }

    /// Compiles `pattern` into a regular expression value.
    pub fn regexp(pattern: &str) -> Result<Self, regex::Error> {
        RegExpValue::new(pattern).map(Value::RegExp)
    }

    /// Builds an error value.
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Value::Error(ErrorValue {
            name: name.into(),
            message: message.into(),
        })
    }

    /// Builds a function value.
    pub fn function(
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Value::Function(FunctionValue::new(name, f))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness: `undefined`, `null`, `false`, `0`, `NaN` and `""` are
    /// falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Whether this value can hold children (object, array, map or set).
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Object(_) | Value::Array(_) | Value::Map(_) | Value::Set(_)
        )
    }

    /// A short name for the kind of value, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Date(_) => "date",
            Value::RegExp(_) => "regexp",
            Value::Error(_) => "error",
            Value::Function(_) => "function",
        }
    }

    /// Converts to JSON.
    ///
    /// `undefined` becomes `null` (and `undefined` properties are dropped),
    /// non-finite numbers become `null`, maps become arrays of `[key, value]`
    /// pairs, sets become arrays, dates become RFC 3339 strings, regular
    /// expressions become `/pattern/` strings, errors become
    /// `{"name", "message"}` objects and functions become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) | Value::Set(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(obj) => Json::Object(
                obj.props
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Map(entries) => Json::Array(
                entries
                    .iter()
                    .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Value::Date(d) => Json::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::RegExp(re) => Json::String(format!("/{}/", re.as_str())),
            Value::Error(e) => serde_json::json!({ "name": e.name, "message": e.message }),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Object(map.into_iter().collect()),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Number(-0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from(" ").is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::Object(Object::new()).is_truthy());
    }

    #[test]
    fn test_from_json_objects_are_plain() {
        let v = Value::from(json!({"a": {"b": [1, "x"]}}));
        let obj = v.as_object().unwrap();
        assert!(obj.is_plain());
        let inner = obj.get("a").and_then(Value::as_object).unwrap();
        assert_eq!(
            inner.get("b"),
            Some(&Value::Array(vec![Value::from(1), Value::from("x")]))
        );
    }

    #[test]
    fn test_from_json_preserves_property_order() {
        let v = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<_> = v.as_object().unwrap().props.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_to_json_roundtrip_for_json_values() {
        let doc = json!({"id": 7, "name": "a", "tags": ["x", null, true], "ratio": 0.5});
        assert_eq!(Value::from(doc.clone()).to_json(), doc);
    }

    #[test]
    fn test_to_json_drops_undefined_props() {
        let v = Value::object([("a", Value::from(1)), ("b", Value::Undefined)]);
        assert_eq!(v.to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_to_json_non_json_kinds() {
        let v = Value::map([("k1", true)]);
        assert_eq!(v.to_json(), json!([["k1", true]]));
        assert_eq!(Value::Number(f64::INFINITY).to_json(), json!(null));
        assert_eq!(
            Value::error("TypeError", "bad").to_json(),
            json!({"name": "TypeError", "message": "bad"})
        );
    }

    #[test]
    fn test_set_drops_duplicates() {
        let v = Value::set([1, 2, 1]);
        assert_eq!(v, Value::Set(vec![Value::from(1), Value::from(2)]));
    }

    #[test]
    fn test_function_identity_equality() {
        let f = Value::function("f", |_| Value::Undefined);
        let g = Value::function("f", |_| Value::Undefined);
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    #[test]
    fn test_regexp_equality_by_pattern() {
        assert_eq!(Value::regexp("^a$").unwrap(), Value::regexp("^a$").unwrap());
        assert!(Value::regexp("(").is_err());
    }

    #[test]
    fn test_class_instance_is_not_plain() {
        let obj = Object::instance_of("Point").with("x", 1).with("y", 2);
        assert!(!obj.is_plain());
        assert_eq!(obj.get("y"), Some(&Value::from(2)));
    }
}
