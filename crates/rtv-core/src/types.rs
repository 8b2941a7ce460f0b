//! # Type Registry
//!
//! The closed set of type names a typeset may refer to. The registry is
//! purely declarative: it knows which types accept an arguments object and
//! which are "object-shaped" (their arguments carry a nested shape under
//! `$`). Behavior lives in the validators registered with the engine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TypesetError;

/// Every type known to the typeset language.
///
/// | Type | Identifier | Args | Object-shaped |
/// |------|------------|------|---------------|
/// | Any | `any` | | |
/// | Null | `null` | | |
/// | String | `string` | yes | |
/// | Boolean | `boolean` | | |
/// | Number | `number` | yes | |
/// | Finite | `finite` | yes | |
/// | Int | `int` | yes | |
/// | SafeInt | `safeInt` | yes | |
/// | Float | `float` | yes | |
/// | Function | `function` | | |
/// | RegExp | `regexp` | | |
/// | Date | `date` | | |
/// | Error | `error` | | |
/// | Array | `array` | yes | |
/// | AnyObject | `anyObject` | yes | yes |
/// | Object | `object` | yes | yes |
/// | PlainObject | `plainObject` | yes | yes |
/// | ClassObject | `classObject` | yes | yes |
/// | HashMap | `hashMap` | yes | |
/// | Map | `map` | yes | |
/// | Set | `set` | yes | |
/// | Json | `json` | | |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeName {
    /// Any value at all, including `undefined` and `null`.
    Any,
    /// Only `null`.
    Null,
    /// A string.
    String,
    /// `true` or `false`.
    Boolean,
    /// Any number except `NaN`.
    Number,
    /// A finite number.
    Finite,
    /// A finite integer.
    Int,
    /// An integer within `±(2^53 - 1)`.
    SafeInt,
    /// Zero, or a finite number with a fractional part.
    Float,
    /// A callable value.
    Function,
    /// A regular expression.
    #[serde(rename = "regexp")]
    RegExp,
    /// A date.
    Date,
    /// An error value.
    Error,
    /// An array.
    Array,
    /// Any non-primitive value.
    AnyObject,
    /// An object that is not an array, collection or other built-in.
    Object,
    /// An object with no class.
    PlainObject,
    /// An object that is an instance of a class.
    ClassObject,
    /// An object used as a string-keyed dictionary.
    HashMap,
    /// A keyed collection with arbitrary keys.
    Map,
    /// A collection of unique values.
    Set,
    /// A JSON-compatible value (shallow check).
    Json,
}

impl TypeName {
    /// Type implied for a bare shape found where a type is expected.
    pub const DEFAULT_OBJECT_TYPE: TypeName = TypeName::Object;

    /// All types, in registry order.
    pub fn all() -> &'static [TypeName] {
        &[
            TypeName::Any,
            TypeName::Null,
            TypeName::String,
            TypeName::Boolean,
            TypeName::Number,
            TypeName::Finite,
            TypeName::Int,
            TypeName::SafeInt,
            TypeName::Float,
            TypeName::Function,
            TypeName::RegExp,
            TypeName::Date,
            TypeName::Error,
            TypeName::Array,
            TypeName::AnyObject,
            TypeName::Object,
            TypeName::PlainObject,
            TypeName::ClassObject,
            TypeName::HashMap,
            TypeName::Map,
            TypeName::Set,
            TypeName::Json,
        ]
    }

    /// The identifier used for this type inside typesets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Finite => "finite",
            Self::Int => "int",
            Self::SafeInt => "safeInt",
            Self::Float => "float",
            Self::Function => "function",
            Self::RegExp => "regexp",
            Self::Date => "date",
            Self::Error => "error",
            Self::Array => "array",
            Self::AnyObject => "anyObject",
            Self::Object => "object",
            Self::PlainObject => "plainObject",
            Self::ClassObject => "classObject",
            Self::HashMap => "hashMap",
            Self::Map => "map",
            Self::Set => "set",
            Self::Json => "json",
        }
    }

    /// Whether the type accepts an arguments object.
    pub fn has_args(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Number
                | Self::Finite
                | Self::Int
                | Self::SafeInt
                | Self::Float
                | Self::Array
                | Self::AnyObject
                | Self::Object
                | Self::PlainObject
                | Self::ClassObject
                | Self::HashMap
                | Self::Map
                | Self::Set
        )
    }

    /// Whether the type's arguments carry a nested shape under `$`.
    pub fn is_object_type(&self) -> bool {
        matches!(
            self,
            Self::AnyObject | Self::Object | Self::PlainObject | Self::ClassObject
        )
    }

    /// Argument names the type's validator reads. Empty for types that
    /// accept no arguments.
    pub fn arg_names(&self) -> &'static [&'static str] {
        match self {
            Self::String => &["oneOf", "exp", "expFlags", "min", "max", "partial"],
            Self::Number | Self::Finite | Self::Int | Self::SafeInt | Self::Float => {
                &["oneOf", "min", "max"]
            }
            Self::Array => &["$", "length", "min", "max"],
            Self::AnyObject | Self::Object | Self::PlainObject => &["$", "exact"],
            Self::ClassObject => &["$", "exact", "ctor"],
            Self::HashMap => &["length", "keyExp", "keyFlags", "$values", "deep"],
            Self::Map => &["length", "$keys", "keyExp", "keyFlags", "$values"],
            Self::Set => &["length", "$values"],
            _ => &[],
        }
    }

    /// Whether `name` is a known type identifier.
    pub fn is_known(name: &str) -> bool {
        name.parse::<TypeName>().is_ok()
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeName {
    type Err = TypesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TypesetError::UnknownType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_types_unique() {
        let set: HashSet<_> = TypeName::all().iter().collect();
        assert_eq!(set.len(), TypeName::all().len());
    }

    #[test]
    fn test_as_str_roundtrip() {
        for t in TypeName::all() {
            let parsed: TypeName = t.as_str().parse().unwrap();
            assert_eq!(*t, parsed);
        }
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for t in TypeName::all() {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(matches!(
            "invalid-type".parse::<TypeName>(),
            Err(TypesetError::UnknownType(name)) if name == "invalid-type"
        ));
        assert!(!TypeName::is_known("String"));
        assert!(TypeName::is_known("safeInt"));
    }

    #[test]
    fn test_object_types_accept_args() {
        for t in TypeName::all() {
            if t.is_object_type() {
                assert!(t.has_args(), "{t} is object-shaped but takes no args");
            }
        }
    }

    #[test]
    fn test_arg_names_only_for_types_with_args() {
        for t in TypeName::all() {
            assert_eq!(t.has_args(), !t.arg_names().is_empty(), "{t}");
        }
    }

    #[test]
    fn test_hash_map_is_not_object_shaped() {
        assert!(TypeName::HashMap.has_args());
        assert!(!TypeName::HashMap.is_object_type());
    }

    #[test]
    fn test_default_object_type() {
        assert_eq!(TypeName::DEFAULT_OBJECT_TYPE, TypeName::Object);
        assert!(TypeName::DEFAULT_OBJECT_TYPE.is_object_type());
    }
}
