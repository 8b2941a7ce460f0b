//! # Typesets
//!
//! A typeset describes the acceptable type(s) and shape of a value. It is a
//! closed sum type with four forms:
//!
//! - [`Typeset::Type`]: a bare type name, e.g. `STRING`.
//! - [`Typeset::Validator`]: a bare custom validator, which implies `ANY`.
//! - [`Typeset::Shape`]: a property → typeset mapping, which implies `OBJECT`.
//! - [`Typeset::List`]: an ordered sequence of [`Rule`]s: an optional leading
//!   qualifier, one or more types each optionally followed by its arguments,
//!   nested lists or shapes, and at most one trailing custom validator.
//!
//! Types in a list are alternatives tried left to right; the first match wins.
//!
//! ## Classification
//!
//! Typesets written as JSON (or YAML) documents are classified once, at the
//! boundary, by [`Typeset::from_json`]. Inside a list, an object is a shape
//! only at index 0, or at index 1 after a qualifier. Everywhere else an object
//! is the arguments object of the preceding type. This positional rule is
//! part of the language; the lint in [`crate::grammar::lint`] flags arguments
//! objects that look like misplaced shapes.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::args::TypeArgs;
use crate::context::Context;
use crate::error::{Expecting, GrammarError, TypesetError};
use crate::qualifier::Qualifier;
use crate::types::TypeName;
use crate::value::Value;

type ValidatorFn =
    dyn Fn(&Value, &Typeset, &Typeset, &Context<'_>) -> anyhow::Result<bool> + Send + Sync;

/// A user-supplied check run after a type has matched.
///
/// The closure receives the value, the fully-qualified subtype that matched,
/// the typeset the validator belongs to, and the validation context.
/// `Ok(true)` passes, `Ok(false)` rejects the value, and `Err` rejects it
/// with the error recorded as the root cause.
#[derive(Clone)]
pub struct CustomValidator(Arc<ValidatorFn>);

impl CustomValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Typeset, &Typeset, &Context<'_>) -> anyhow::Result<bool>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// A validator that only looks at the value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |v, _, _, _| Ok(f(v)))
    }

    pub fn call(
        &self,
        value: &Value,
        matched: &Typeset,
        typeset: &Typeset,
        context: &Context<'_>,
    ) -> anyhow::Result<bool> {
        (self.0)(value, matched, typeset, context)
    }
}

impl PartialEq for CustomValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<validator>")
    }
}

/// A property → typeset mapping describing an object's interface.
///
/// A property mapped to `None` is ignored (written as a falsy value in
/// JSON typesets, e.g. `{"foo": null}`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape(IndexMap<String, Option<Typeset>>);

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds property `key` with typeset `ts`.
    pub fn with(mut self, key: impl Into<String>, ts: impl Into<Typeset>) -> Self {
        self.0.insert(key.into(), Some(ts.into()));
        self
    }

    /// Adds property `key` with no typeset; the property is ignored.
    pub fn ignoring(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), None);
        self
    }

    /// Every declared property, including ignored ones.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Declared properties and their typesets, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Typeset>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Properties that carry a typeset, in declaration order.
    pub fn typesets(&self) -> impl Iterator<Item = (&str, &Typeset)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|ts| (k.as_str(), ts)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Classifies a JSON shape. Falsy property values are ignored.
    pub fn from_json(map: &serde_json::Map<String, Json>) -> Result<Self, TypesetError> {
        let mut props = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let ts = if crate::args::json_truthy(value) {
                Some(Typeset::classify(value)?)
            } else {
                None
            };
            props.insert(key.clone(), ts);
        }
        Ok(Self(props))
    }

    pub fn to_json(&self) -> Json {
        Json::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.as_ref().map_or(Json::Null, Typeset::to_json)))
                .collect(),
        )
    }
}

impl<K: Into<String>, T: Into<Typeset>> FromIterator<(K, T)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, ts)| (k.into(), Some(ts.into())))
                .collect(),
        )
    }
}

/// One element of a list typeset.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Leading qualifier.
    Qualifier(Qualifier),
    /// A candidate type.
    Type(TypeName),
    /// Arguments for the preceding type.
    Args(TypeArgs),
    /// A shape in leading position (implies `OBJECT`).
    Shape(Shape),
    /// A nested list (implies `ARRAY` whose elements match the list).
    List(Vec<Rule>),
    /// Trailing custom validator.
    Validator(CustomValidator),
}

impl Rule {
    pub fn is_qualifier(&self) -> bool {
        matches!(self, Rule::Qualifier(_))
    }

    pub fn is_validator(&self) -> bool {
        matches!(self, Rule::Validator(_))
    }

    /// The rule as a standalone typeset. Qualifiers and arguments are not
    /// typesets on their own.
    pub fn as_typeset(&self) -> Option<Typeset> {
        match self {
            Rule::Type(t) => Some(Typeset::Type(*t)),
            Rule::Shape(s) => Some(Typeset::Shape(s.clone())),
            Rule::List(l) => Some(Typeset::List(l.clone())),
            Rule::Validator(v) => Some(Typeset::Validator(v.clone())),
            Rule::Qualifier(_) | Rule::Args(_) => None,
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Rule::Qualifier(q) => Json::String(q.as_str().to_string()),
            Rule::Type(t) => Json::String(t.as_str().to_string()),
            Rule::Args(a) => a.to_json(),
            Rule::Shape(s) => s.to_json(),
            Rule::List(l) => Json::Array(l.iter().map(Rule::to_json).collect()),
            Rule::Validator(_) => Json::String(VALIDATOR_PLACEHOLDER.to_string()),
        }
    }
}

impl From<Qualifier> for Rule {
    fn from(q: Qualifier) -> Self {
        Rule::Qualifier(q)
    }
}

impl From<TypeName> for Rule {
    fn from(t: TypeName) -> Self {
        Rule::Type(t)
    }
}

impl From<TypeArgs> for Rule {
    fn from(a: TypeArgs) -> Self {
        Rule::Args(a)
    }
}

impl From<Shape> for Rule {
    fn from(s: Shape) -> Self {
        Rule::Shape(s)
    }
}

impl From<Vec<Rule>> for Rule {
    fn from(l: Vec<Rule>) -> Self {
        Rule::List(l)
    }
}

impl From<CustomValidator> for Rule {
    fn from(v: CustomValidator) -> Self {
        Rule::Validator(v)
    }
}

impl From<Typeset> for Rule {
    fn from(ts: Typeset) -> Self {
        match ts {
            Typeset::Type(t) => Rule::Type(t),
            Typeset::Validator(v) => Rule::Validator(v),
            Typeset::Shape(s) => Rule::Shape(s),
            Typeset::List(l) => Rule::List(l),
        }
    }
}

pub(crate) const VALIDATOR_PLACEHOLDER: &str = "<validator>";

/// A typeset in any of its four forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Typeset {
    Type(TypeName),
    Validator(CustomValidator),
    Shape(Shape),
    List(Vec<Rule>),
}

impl Typeset {
    /// Builds a list typeset from anything convertible to rules.
    pub fn list<R: Into<Rule>>(rules: impl IntoIterator<Item = R>) -> Self {
        Typeset::List(rules.into_iter().map(Into::into).collect())
    }

    pub fn as_list(&self) -> Option<&[Rule]> {
        match self {
            Typeset::List(rules) => Some(rules),
            _ => None,
        }
    }

    /// Classifies a JSON typeset document.
    ///
    /// Strings are type names, objects are shapes and arrays are lists.
    /// Custom validators cannot be expressed in JSON.
    pub fn from_json(json: &Json) -> Result<Self, TypesetError> {
        let ts = Self::classify(json)?;
        for warning in crate::grammar::lint(&ts) {
            tracing::warn!(%warning, "typeset lint");
        }
        Ok(ts)
    }

    pub(crate) fn classify(json: &Json) -> Result<Self, TypesetError> {
        let classified = match json {
            Json::String(s) => classify_name(s).and_then(|rule| match rule {
                Rule::Type(t) => Ok(Typeset::Type(t)),
                _ => Err(GrammarError::QualifierOnly.into()),
            }),
            Json::Object(map) => Shape::from_json(map)
                .map(Typeset::Shape)
                .map_err(ClassifyError::from),
            Json::Array(items) => rules_from_json(items).map(Typeset::List),
            other => Err(GrammarError::NotATypeset(other.to_string()).into()),
        };

        classified.map_err(|e| match e {
            ClassifyError::Grammar(reason) => TypesetError::Invalid {
                typeset: json.to_string(),
                reason,
            },
            ClassifyError::Typeset(err) => err,
        })
    }

    /// Parses and classifies a JSON typeset document.
    pub fn from_json_str(text: &str) -> Result<Self, TypesetError> {
        let json: Json = serde_json::from_str(text)?;
        Self::from_json(&json)
    }

    /// Renders the typeset as JSON; custom validators become `"<validator>"`.
    pub fn to_json(&self) -> Json {
        match self {
            Typeset::Type(t) => Json::String(t.as_str().to_string()),
            Typeset::Validator(_) => Json::String(VALIDATOR_PLACEHOLDER.to_string()),
            Typeset::Shape(s) => s.to_json(),
            Typeset::List(l) => Json::Array(l.iter().map(Rule::to_json).collect()),
        }
    }
}

impl std::fmt::Display for Typeset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::print::print_typeset(self))
    }
}

impl From<TypeName> for Typeset {
    fn from(t: TypeName) -> Self {
        Typeset::Type(t)
    }
}

impl From<Shape> for Typeset {
    fn from(s: Shape) -> Self {
        Typeset::Shape(s)
    }
}

impl From<CustomValidator> for Typeset {
    fn from(v: CustomValidator) -> Self {
        Typeset::Validator(v)
    }
}

impl From<Vec<Rule>> for Typeset {
    fn from(l: Vec<Rule>) -> Self {
        Typeset::List(l)
    }
}

impl TryFrom<Json> for Typeset {
    type Error = TypesetError;

    fn try_from(json: Json) -> Result<Self, Self::Error> {
        Typeset::from_json(&json)
    }
}

impl TryFrom<&Json> for Typeset {
    type Error = TypesetError;

    fn try_from(json: &Json) -> Result<Self, Self::Error> {
        Typeset::from_json(json)
    }
}

impl<'de> serde::Deserialize<'de> for Typeset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        Typeset::from_json(&json).map_err(serde::de::Error::custom)
    }
}

/// Builds a list typeset: `typeset![Qualifier::Optional, TypeName::String]`.
#[macro_export]
macro_rules! typeset {
    ($($rule:expr),* $(,)?) => {
        $crate::typeset::Typeset::List(vec![$($crate::typeset::Rule::from($rule)),*])
    };
}

enum ClassifyError {
    Grammar(GrammarError),
    Typeset(TypesetError),
}

impl From<GrammarError> for ClassifyError {
    fn from(e: GrammarError) -> Self {
        ClassifyError::Grammar(e)
    }
}

impl From<TypesetError> for ClassifyError {
    fn from(e: TypesetError) -> Self {
        ClassifyError::Typeset(e)
    }
}

fn classify_name(s: &str) -> Result<Rule, ClassifyError> {
    if let Ok(q) = s.parse::<Qualifier>() {
        return Ok(Rule::Qualifier(q));
    }
    s.parse::<TypeName>()
        .map(Rule::Type)
        .map_err(|_| GrammarError::UnknownType(s.to_string()).into())
}

fn rules_from_json(items: &[Json]) -> Result<Vec<Rule>, ClassifyError> {
    let has_qualifier = matches!(
        items.first(),
        Some(Json::String(s)) if s.parse::<Qualifier>().is_ok()
    );

    let mut rules = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let leading = index == 0 || (index == 1 && has_qualifier);
        let rule = match item {
            Json::String(s) => classify_name(s)?,
            Json::Object(map) if leading => Rule::Shape(Shape::from_json(map)?),
            Json::Object(map) => Rule::Args(TypeArgs::from_json(map)?),
            Json::Array(inner) => Rule::List(
                rules_from_json(inner)
                    .map_err(|e| nest_classify_error(e, format!("index={index}")))?,
            ),
            _ => {
                return Err(GrammarError::Unexpected {
                    index,
                    expecting: if leading {
                        Expecting::Shape
                    } else {
                        Expecting::TypeArgs
                    },
                }
                .into())
            }
        };
        rules.push(rule);
    }
    Ok(rules)
}

fn nest_classify_error(e: ClassifyError, location: String) -> ClassifyError {
    match e {
        ClassifyError::Grammar(g) => ClassifyError::Grammar(g.nested(location)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(v: Json) -> Typeset {
        Typeset::from_json(&v).unwrap()
    }

    #[test]
    fn test_string_is_type() {
        assert_eq!(classify(json!("string")), Typeset::Type(TypeName::String));
    }

    #[test]
    fn test_lone_qualifier_rejected() {
        let err = Typeset::from_json(&json!("?")).unwrap_err();
        assert!(matches!(
            err,
            TypesetError::Invalid { reason: GrammarError::QualifierOnly, .. }
        ));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Typeset::from_json(&json!(["invalid-type"])).unwrap_err();
        assert!(err.to_string().contains("invalid-type"), "{err}");
    }

    #[test]
    fn test_object_at_index_zero_is_shape() {
        let ts = classify(json!([{"foo": "string"}]));
        assert!(matches!(ts.as_list().unwrap()[0], Rule::Shape(_)));
    }

    #[test]
    fn test_object_after_qualifier_is_shape() {
        let ts = classify(json!(["?", {"foo": "string"}]));
        let rules = ts.as_list().unwrap();
        assert_eq!(rules[0], Rule::Qualifier(Qualifier::Optional));
        assert!(matches!(rules[1], Rule::Shape(_)));
    }

    #[test]
    fn test_object_after_type_is_args() {
        let ts = classify(json!(["string", {"min": 2}]));
        let rules = ts.as_list().unwrap();
        match &rules[1] {
            Rule::Args(a) => assert_eq!(a.number("min"), Some(2.0)),
            other => panic!("expected args, got {other:?}"),
        }
    }

    #[test]
    fn test_positional_rule_makes_late_shape_args() {
        // A shape after a type is read as that type's arguments.
        let ts = classify(json!(["string", {"foo": "finite"}]));
        assert!(matches!(ts.as_list().unwrap()[1], Rule::Args(_)));
    }

    #[test]
    fn test_non_object_at_shape_position_message() {
        let err = Typeset::from_json(&json!([1])).unwrap_err();
        assert!(err
            .to_string()
            .contains("Unexpected value at index=0: Expecting object (shape)"));

        let err = Typeset::from_json(&json!(["!", 1])).unwrap_err();
        assert!(err
            .to_string()
            .contains("Unexpected value at index=1: Expecting object (shape)"));
    }

    #[test]
    fn test_non_object_at_args_position_message() {
        let err = Typeset::from_json(&json!(["classObject", 1])).unwrap_err();
        assert!(err
            .to_string()
            .contains("Unexpected value at index=1: Expecting object (type args)"));

        let err = Typeset::from_json(&json!(["!", "plainObject", 1])).unwrap_err();
        assert!(err
            .to_string()
            .contains("Unexpected value at index=2: Expecting object (type args)"));
    }

    #[test]
    fn test_falsy_shape_props_ignored() {
        let ts = classify(json!({"foo": null, "bar": "string"}));
        match ts {
            Typeset::Shape(shape) => {
                assert_eq!(shape.len(), 2);
                assert_eq!(shape.typesets().count(), 1);
            }
            other => panic!("expected shape, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_list() {
        let ts = classify(json!([["finite"]]));
        assert_eq!(
            ts,
            Typeset::List(vec![Rule::List(vec![Rule::Type(TypeName::Finite)])])
        );
    }

    #[test]
    fn test_to_json_roundtrip() {
        let doc = json!(["?", "string", {"min": 1}, "array", {"$": {"a": "finite"}}]);
        assert_eq!(classify(doc.clone()).to_json(), doc);
    }

    #[test]
    fn test_deserialize() {
        let ts: Typeset = serde_json::from_str(r#"["+", "finite"]"#).unwrap();
        assert_eq!(ts, typeset![Qualifier::Expected, TypeName::Finite]);
    }

    #[test]
    fn test_macro_mixed_rules() {
        let v = CustomValidator::from_fn(|_| true);
        let ts = typeset![TypeName::Finite, v.clone()];
        assert_eq!(
            ts,
            Typeset::List(vec![Rule::Type(TypeName::Finite), Rule::Validator(v)])
        );
    }

    #[test]
    fn test_validator_identity_equality() {
        let a = CustomValidator::from_fn(|_| true);
        let b = CustomValidator::from_fn(|_| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
