//! Validators for keyed and unkeyed collections: HASH_MAP, MAP and SET.
//!
//! All three share the same outline. The value must be the right kind of
//! collection; without arguments that is all, and the minimum viable value
//! is an empty collection. `length` requires an exact entry count. Entries
//! are then checked in insertion order, keys before values, stopping at the
//! first failure. Failure paths name the entry with a `key=` or `valueKey=`
//! segment holding the printed key.
//!
//! | Type | Key checks | Value check |
//! |------|------------|-------------|
//! | HASH_MAP | `keyExp` + `keyFlags` | `$values`, retried as a nested HASH_MAP with `deep` |
//! | MAP | `$keys`, then `keyExp` + `keyFlags` for string keys | `$values` |
//! | SET | | `$values` per element |

use regex::Regex;
use rtv_core::{
    fully_qualify, Context, ParentKey, Qualifier, Rule, TypeArgs, TypeName, Typeset,
    TypesetError, Value, Verdict,
};

use super::{
    child_failure, compile_pattern, key_segment, mismatch, mismatch_at, typeset_arg,
    TypeValidator,
};
use crate::engine::Engine;

/// `keyExp` compiled with `keyFlags`, if given.
fn key_pattern(args: &TypeArgs) -> Result<Option<Regex>, TypesetError> {
    args.non_empty_string("keyExp")
        .map(|exp| compile_pattern(exp, args.non_empty_string("keyFlags")))
        .transpose()
}

/// Whether `len` satisfies the `length` argument, if any.
fn has_length(args: &TypeArgs, len: usize) -> bool {
    args.count("length").map_or(true, |length| len as f64 == length)
}

/// Whether `typeset` describes nothing but a string, like `STRING` or
/// `["?", STRING]`. Arguments or alternatives make it something more.
fn is_string_typeset(typeset: &Typeset) -> bool {
    match fully_qualify(typeset, None) {
        Ok(Typeset::List(rules)) => {
            rules.len() == 2 && rules[1] == Rule::Type(TypeName::String)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashMapValidator;

impl TypeValidator for HashMapValidator {
    fn type_name(&self) -> TypeName {
        TypeName::HashMap
    }

    fn validate<'a>(
        &self,
        engine: &Engine,
        value: &'a Value,
        qualifier: Qualifier,
        args: Option<&TypeArgs>,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        if qualifier.permits(value) {
            return Ok(Verdict::success(value.clone()));
        }
        let Value::Object(object) = value else {
            return Ok(mismatch(value, TypeName::HashMap, qualifier, args)?.into());
        };
        let mut mvv = rtv_core::Object::new();
        let Some(type_args) = args else {
            return Ok(Verdict::success(Value::Object(mvv)));
        };
        if !has_length(type_args, object.props.len()) {
            return Ok(mismatch(value, TypeName::HashMap, qualifier, args)?.into());
        }

        let key_exp = key_pattern(type_args)?;
        let values_ts = typeset_arg(type_args, "$values");
        if key_exp.is_none() && values_ts.is_none() {
            return Ok(Verdict::success(Value::Object(mvv)));
        }

        for (key, child) in &object.props {
            let printed_key = Value::String(key.clone());
            if key_exp.as_ref().is_some_and(|re| !re.is_match(key)) {
                let path = vec![key_segment("key", &printed_key)];
                return Ok(mismatch_at(value, TypeName::HashMap, qualifier, args, path)?.into());
            }

            let Some(values_ts) = values_ts else { continue };
            let ctx = context.derive(value, Some(ParentKey::Prop(key.clone())));
            let mut verdict = engine.check_in(child, values_ts, &ctx)?;
            if !verdict.is_valid() && type_args.flag("deep") == Some(true) {
                let nested = Typeset::List(vec![
                    Rule::Qualifier(qualifier),
                    Rule::Type(TypeName::HashMap),
                    Rule::Args(type_args.clone()),
                ]);
                verdict = engine.check_in(child, &nested, &ctx)?;
            }
            match verdict {
                Verdict::Success(success) => {
                    mvv.props.insert(key.clone(), success.mvv);
                }
                Verdict::Error(err) => {
                    let segment = key_segment("valueKey", &printed_key);
                    return child_failure(value, TypeName::HashMap, qualifier, args, segment, &err);
                }
            }
        }
        Ok(Verdict::success(Value::Object(mvv)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MapValidator;

impl TypeValidator for MapValidator {
    fn type_name(&self) -> TypeName {
        TypeName::Map
    }

    fn validate<'a>(
        &self,
        engine: &Engine,
        value: &'a Value,
        qualifier: Qualifier,
        args: Option<&TypeArgs>,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        if qualifier.permits(value) {
            return Ok(Verdict::success(value.clone()));
        }
        let Value::Map(entries) = value else {
            return Ok(mismatch(value, TypeName::Map, qualifier, args)?.into());
        };
        let Some(type_args) = args else {
            return Ok(Verdict::success(Value::Map(Vec::new())));
        };
        if !has_length(type_args, entries.len()) {
            return Ok(mismatch(value, TypeName::Map, qualifier, args)?.into());
        }

        let keys_ts = typeset_arg(type_args, "$keys");
        let values_ts = typeset_arg(type_args, "$values");
        let keys_are_strings = keys_ts.map_or(true, is_string_typeset);
        let key_exp = if keys_are_strings {
            key_pattern(type_args)?
        } else {
            None
        };
        if keys_ts.is_none() && values_ts.is_none() && key_exp.is_none() {
            return Ok(Verdict::success(Value::Map(Vec::new())));
        }

        let mut mvv = Vec::with_capacity(entries.len());
        for (key, child) in entries {
            let key_mvv = match keys_ts {
                Some(keys_ts) => {
                    let ctx = context.derive(value, None);
                    match engine.check_in(key, keys_ts, &ctx)? {
                        Verdict::Success(success) => success.mvv,
                        Verdict::Error(err) => {
                            let segment = key_segment("key", key);
                            return child_failure(value, TypeName::Map, qualifier, args, segment, &err);
                        }
                    }
                }
                None => Value::Undefined,
            };

            if let (Some(re), Value::String(k)) = (&key_exp, key) {
                if !re.is_match(k) {
                    let path = vec![key_segment("key", key)];
                    return Ok(mismatch_at(value, TypeName::Map, qualifier, args, path)?.into());
                }
            }

            let value_mvv = match values_ts {
                Some(values_ts) => {
                    let ctx = context.derive(value, Some(ParentKey::Key(key.clone())));
                    match engine.check_in(child, values_ts, &ctx)? {
                        Verdict::Success(success) => success.mvv,
                        Verdict::Error(err) => {
                            let segment = key_segment("valueKey", key);
                            return child_failure(value, TypeName::Map, qualifier, args, segment, &err);
                        }
                    }
                }
                None => Value::Undefined,
            };
            if keys_ts.is_some() || values_ts.is_some() {
                insert_entry(&mut mvv, key_mvv, value_mvv);
            }
        }
        Ok(Verdict::success(Value::Map(mvv)))
    }
}

/// Map insertion: an equal key keeps its position and takes the new value.
fn insert_entry(entries: &mut Vec<(Value, Value)>, key: Value, value: Value) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SetValidator;

impl TypeValidator for SetValidator {
    fn type_name(&self) -> TypeName {
        TypeName::Set
    }

    fn validate<'a>(
        &self,
        engine: &Engine,
        value: &'a Value,
        qualifier: Qualifier,
        args: Option<&TypeArgs>,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        if qualifier.permits(value) {
            return Ok(Verdict::success(value.clone()));
        }
        let Value::Set(elems) = value else {
            return Ok(mismatch(value, TypeName::Set, qualifier, args)?.into());
        };
        let Some(type_args) = args else {
            return Ok(Verdict::success(Value::Set(Vec::new())));
        };
        if !has_length(type_args, elems.len()) {
            return Ok(mismatch(value, TypeName::Set, qualifier, args)?.into());
        }
        let Some(values_ts) = typeset_arg(type_args, "$values") else {
            return Ok(Verdict::success(Value::Set(Vec::new())));
        };

        let mut mvv = Vec::with_capacity(elems.len());
        for elem in elems {
            let ctx = context.derive(value, None);
            match engine.check_in(elem, values_ts, &ctx)? {
                Verdict::Success(success) => {
                    if !mvv.contains(&success.mvv) {
                        mvv.push(success.mvv);
                    }
                }
                Verdict::Error(err) => {
                    let segment = key_segment("key", elem);
                    return child_failure(value, TypeName::Set, qualifier, args, segment, &err);
                }
            }
        }
        Ok(Verdict::success(Value::Set(mvv)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtv_core::Failure;
    use serde_json::json;

    fn ts(v: serde_json::Value) -> Typeset {
        Typeset::from_json(&v).unwrap()
    }

    // -- HASH_MAP --

    #[test]
    fn test_hash_map_requires_object() {
        let engine = Engine::standard();
        assert!(!engine.check(&Value::array([1]), &ts(json!("hashMap"))).unwrap().is_valid());
        let verdict = engine
            .check(&Value::object([("a", 1)]), &ts(json!("hashMap")))
            .unwrap();
        assert_eq!(verdict.mvv().unwrap().to_json(), json!({}));
    }

    #[test]
    fn test_hash_map_key_exp() {
        let engine = Engine::standard();
        let value = Value::object([("ab", 1), ("Cd", 2)]);
        let typeset = ts(json!(["hashMap", {"keyExp": "^[a-z]+$"}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        let err = verdict.error().unwrap();
        assert_eq!(err.path, vec!["key=\"Cd\"".to_string()]);
        assert_eq!(
            err.mismatch.to_json(),
            json!(["!", "hashMap", {"keyExp": "^[a-z]+$"}])
        );

        let typeset = ts(json!(["hashMap", {"keyExp": "^[a-z]+$", "keyFlags": "i"}]));
        assert!(engine.check(&value, &typeset).unwrap().is_valid());
    }

    #[test]
    fn test_hash_map_values() {
        let engine = Engine::standard();
        let value = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
        let typeset = ts(json!(["hashMap", {"$values": "finite"}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        let err = verdict.error().unwrap();
        assert_eq!(err.path, vec!["valueKey=\"b\"".to_string()]);
        assert_eq!(err.mismatch.to_json(), json!(["!", "finite"]));
    }

    #[test]
    fn test_hash_map_length() {
        let engine = Engine::standard();
        let value = Value::object([("a", 1)]);
        assert!(engine.check(&value, &ts(json!(["hashMap", {"length": 1}]))).unwrap().is_valid());
        assert!(!engine.check(&value, &ts(json!(["hashMap", {"length": 2}]))).unwrap().is_valid());
    }

    #[test]
    fn test_hash_map_deep() {
        let engine = Engine::standard();
        let value = Value::object([
            ("a", Value::from(1)),
            ("b", Value::object([("c", 2), ("d", 3)])),
        ]);
        let typeset = ts(json!(["hashMap", {"$values": "finite", "deep": true}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(verdict.mvv().unwrap().to_json(), json!({"a": 1, "b": {"c": 2, "d": 3}}));

        let shallow = ts(json!(["hashMap", {"$values": "finite"}]));
        assert!(!engine.check(&value, &shallow).unwrap().is_valid());
    }

    // -- MAP --

    #[test]
    fn test_map_without_args() {
        let engine = Engine::standard();
        let value = Value::map([("a", 1)]);
        let verdict = engine.check(&value, &ts(json!("map"))).unwrap();
        assert_eq!(verdict.mvv(), Some(&Value::Map(Vec::new())));
        assert!(!engine.check(&Value::object([("a", 1)]), &ts(json!("map"))).unwrap().is_valid());
    }

    #[test]
    fn test_map_key_exp_reports_key() {
        let engine = Engine::standard();
        let value = Value::map([("good", 1), ("bad", 2)]);
        let typeset = ts(json!(["map", {"keyExp": "^good$"}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(verdict.error().unwrap().path, vec!["key=\"bad\"".to_string()]);
    }

    #[test]
    fn test_map_key_exp_ignored_for_non_string_keys() {
        let engine = Engine::standard();
        let value = Value::map([(1, "a")]);
        let typeset = ts(json!(["map", {"$keys": "finite", "keyExp": "^x$"}]));
        assert!(engine.check(&value, &typeset).unwrap().is_valid());

        // numeric keys are never tested against the pattern
        let typeset = ts(json!(["map", {"keyExp": "^x$"}]));
        assert!(engine.check(&value, &typeset).unwrap().is_valid());
    }

    #[test]
    fn test_map_keys_and_values() {
        let engine = Engine::standard();
        let value = Value::map([(Value::from(1), Value::from("a")), (Value::from("2"), Value::from("b"))]);
        let typeset = ts(json!(["map", {"$keys": "finite", "$values": "string"}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(verdict.error().unwrap().path, vec!["key=\"2\"".to_string()]);

        let value = Value::map([(Value::from(1), Value::from("a")), (Value::from(2), Value::from(3))]);
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(verdict.error().unwrap().path, vec!["valueKey=2".to_string()]);
    }

    #[test]
    fn test_map_mvv_holds_only_checked_parts() {
        let engine = Engine::standard();
        let value = Value::map([
            ("a", Value::object([("x", 1), ("y", 2)])),
            ("b", Value::object([("x", 3)])),
        ]);

        let typeset = ts(json!(["map", {"$keys": "string"}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(
            verdict.mvv(),
            Some(&Value::map([("a", Value::Undefined), ("b", Value::Undefined)]))
        );

        let typeset = ts(json!(["map", {"$keys": "string", "$values": {"x": "finite"}}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(
            verdict.mvv(),
            Some(&Value::map([
                ("a", Value::object([("x", 1)])),
                ("b", Value::object([("x", 3)])),
            ]))
        );

        // unchecked keys collapse into a single undefined key
        let typeset = ts(json!(["map", {"$values": {"x": "finite"}}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(
            verdict.mvv(),
            Some(&Value::Map(vec![(Value::Undefined, Value::object([("x", 3)]))]))
        );
    }

    #[test]
    fn test_map_key_exp_alone_keeps_values_out_of_mvv() {
        let engine = Engine::standard();
        let value = Value::map([("k1", Value::object([("password", "hunter2")]))]);
        let typeset = ts(json!(["map", {"keyExp": "^k\\d+$"}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        assert_eq!(verdict.mvv(), Some(&Value::Map(Vec::new())));
    }

    #[test]
    fn test_is_string_typeset() {
        assert!(is_string_typeset(&ts(json!("string"))));
        assert!(is_string_typeset(&ts(json!(["?", "string"]))));
        assert!(!is_string_typeset(&ts(json!(["string", {"min": 2}]))));
        assert!(!is_string_typeset(&ts(json!(["string", "finite"]))));
    }

    // -- SET --

    #[test]
    fn test_set_values() {
        let engine = Engine::standard();
        let value = Value::set([Value::from(1), Value::from("x")]);
        let typeset = ts(json!(["set", {"$values": "finite"}]));
        let verdict = engine.check(&value, &typeset).unwrap();
        let err = verdict.error().unwrap();
        assert_eq!(err.path, vec!["key=\"x\"".to_string()]);
        assert_eq!(err.root_cause, None::<Failure>);
    }

    #[test]
    fn test_set_mvv_and_length() {
        let engine = Engine::standard();
        let value = Value::set([1, 2, 3]);
        let verdict = engine.check(&value, &ts(json!(["set", {"length": 3}]))).unwrap();
        assert_eq!(verdict.mvv(), Some(&Value::Set(Vec::new())));
        assert!(!engine.check(&value, &ts(json!(["set", {"length": 2}]))).unwrap().is_valid());

        let verdict = engine.check(&value, &ts(json!(["set", {"$values": "int"}]))).unwrap();
        assert_eq!(verdict.mvv(), Some(&value));
    }
}
