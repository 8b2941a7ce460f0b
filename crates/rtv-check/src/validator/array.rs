//! ARRAY validator.
//!
//! `length` takes precedence over `min`/`max`. Elements are then checked
//! against `$` in order, stopping at the first failure. The minimum viable
//! value holds the elements' own minimum viable values, and is empty when no
//! element typeset is given.

use rtv_core::{Context, ParentKey, Qualifier, TypeArgs, TypeName, TypesetError, Value, Verdict};

use super::{child_failure, mismatch, typeset_arg, within_bounds, TypeValidator};
use crate::engine::Engine;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayValidator;

impl TypeValidator for ArrayValidator {
    fn type_name(&self) -> TypeName {
        TypeName::Array
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
        let Value::Array(elems) = value else {
            return Ok(mismatch(value, TypeName::Array, qualifier, args)?.into());
        };
        let Some(type_args) = args else {
            return Ok(Verdict::success(Value::Array(Vec::new())));
        };

        let len = elems.len() as f64;
        let sized = match type_args.count("length") {
            Some(length) => len == length,
            None => within_bounds(len, type_args.count("min"), type_args.count("max")),
        };
        if !sized {
            return Ok(mismatch(value, TypeName::Array, qualifier, args)?.into());
        }

        let mut mvv = Vec::new();
        if let Some(elem_ts) = typeset_arg(type_args, "$") {
            mvv.reserve(elems.len());
            for (i, elem) in elems.iter().enumerate() {
                let ctx = context.derive(value, Some(ParentKey::Index(i)));
                match engine.check_in(elem, elem_ts, &ctx)? {
                    Verdict::Success(success) => mvv.push(success.mvv),
                    Verdict::Error(err) => {
                        return child_failure(
                            value,
                            TypeName::Array,
                            qualifier,
                            args,
                            i.to_string(),
                            &err,
                        );
                    }
                }
            }
        }
        Ok(Verdict::success(Value::Array(mvv)))
    }
}
