//! # Type Arguments
//!
//! The arguments object that may follow a type in a list typeset, e.g. the
//! `{min: 1}` in `[STRING, {min: 1}]`. Arguments are type-specific and only
//! shallowly structured: the nested-typeset carriers (`$`, `$keys`,
//! `$values`) hold typesets, everything else is plain JSON data.
//!
//! Accessors never fail. An argument of the wrong JSON kind reads as absent,
//! so validators ignore ill-typed arguments instead of rejecting them.

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::error::TypesetError;
use crate::typeset::{Shape, Typeset};
use crate::types::TypeName;

/// Argument names whose values are typesets rather than data.
pub const TYPESET_ARG_KEYS: &[&str] = &["$", "$keys", "$values"];

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A nested typeset (`$`, `$keys`, `$values`).
    Typeset(Typeset),
    /// Any other argument.
    Data(Json),
}

impl ArgValue {
    pub fn as_typeset(&self) -> Option<&Typeset> {
        match self {
            ArgValue::Typeset(ts) => Some(ts),
            ArgValue::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&Json> {
        match self {
            ArgValue::Data(d) => Some(d),
            ArgValue::Typeset(_) => None,
        }
    }

    /// Renders the argument as JSON (validators print as `"<validator>"`).
    pub fn to_json(&self) -> Json {
        match self {
            ArgValue::Typeset(ts) => ts.to_json(),
            ArgValue::Data(d) => d.clone(),
        }
    }
}

impl From<Typeset> for ArgValue {
    fn from(ts: Typeset) -> Self {
        ArgValue::Typeset(ts)
    }
}

impl From<TypeName> for ArgValue {
    fn from(t: TypeName) -> Self {
        ArgValue::Typeset(Typeset::Type(t))
    }
}

impl From<Shape> for ArgValue {
    fn from(shape: Shape) -> Self {
        ArgValue::Typeset(Typeset::Shape(shape))
    }
}

impl From<Json> for ArgValue {
    fn from(d: Json) -> Self {
        ArgValue::Data(d)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        ArgValue::Data(Json::from(n))
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Data(Json::from(n))
    }
}

impl From<i32> for ArgValue {
    fn from(n: i32) -> Self {
        ArgValue::Data(Json::from(n))
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Data(Json::Bool(b))
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Data(Json::String(s.to_string()))
    }
}

/// An ordered arguments object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeArgs(IndexMap<String, ArgValue>);

impl TypeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets argument `key`, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument `key` as plain data.
    pub fn data(&self, key: &str) -> Option<&Json> {
        self.get(key).and_then(ArgValue::as_data)
    }

    /// Argument `key` if it is a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.data(key).and_then(Json::as_f64)
    }

    /// Argument `key` if it is a non-negative finite number.
    pub fn count(&self, key: &str) -> Option<f64> {
        self.number(key).filter(|n| n.is_finite() && *n >= 0.0)
    }

    /// Argument `key` if it is a string.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.data(key).and_then(Json::as_str)
    }

    /// Argument `key` if it is a non-empty string.
    pub fn non_empty_string(&self, key: &str) -> Option<&str> {
        self.string(key).filter(|s| !s.is_empty())
    }

    /// Truthiness of argument `key`, or `None` if the argument is absent.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| match v {
            ArgValue::Typeset(_) => true,
            ArgValue::Data(d) => json_truthy(d),
        })
    }

    /// Argument `key` if it holds a typeset.
    pub fn typeset(&self, key: &str) -> Option<&Typeset> {
        self.get(key).and_then(ArgValue::as_typeset)
    }

    /// Argument `key` if it holds a shape.
    pub fn shape(&self, key: &str) -> Option<&Shape> {
        match self.typeset(key) {
            Some(Typeset::Shape(shape)) => Some(shape),
            _ => None,
        }
    }

    /// Classifies a JSON arguments object.
    ///
    /// `$`, `$keys` and `$values` become typesets when they classify as one;
    /// otherwise they are kept as data (and rejected by deep grammar checks).
    pub fn from_json(map: &Map<String, Json>) -> Result<Self, TypesetError> {
        let mut args = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let arg = if TYPESET_ARG_KEYS.contains(&key.as_str()) {
                match Typeset::classify(value) {
                    Ok(ts) => ArgValue::Typeset(ts),
                    Err(_) => ArgValue::Data(value.clone()),
                }
            } else {
                ArgValue::Data(value.clone())
            };
            args.insert(key.clone(), arg);
        }
        Ok(Self(args))
    }

    /// Renders the arguments as a JSON object.
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for TypeArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub(crate) fn json_truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Json::String(s) => !s.is_empty(),
        Json::Array(_) | Json::Object(_) => true,
    }
}
