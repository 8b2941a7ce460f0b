//! Validators for the object types: ANY_OBJECT, OBJECT, PLAIN_OBJECT and
//! CLASS_OBJECT.
//!
//! All four take a shape under `$` and check each property that has a
//! typeset, in shape order. A property missing from the value is checked as
//! `undefined`. With `exact` (or [`rtv_core::CheckOptions::exact_shapes`]
//! when `exact` is absent), properties the shape does not declare are a
//! mismatch. CLASS_OBJECT additionally takes `ctor`, the name of the class
//! the value must be an instance of.
//!
//! The minimum viable value is always a plain object holding the checked
//! properties only.

use rtv_core::predicate::predicate_for;
use rtv_core::{
    Context, Failure, Object, ParentKey, Qualifier, TypeArgs, TypeName, Typeset, TypesetError,
    Value, Verdict,
};

use super::{mismatch, TypeValidator};
use crate::engine::Engine;

static UNDEFINED: Value = Value::Undefined;

#[derive(Debug, Clone, Copy)]
pub struct ObjectValidator {
    type_name: TypeName,
    predicate: fn(&Value) -> bool,
}

impl ObjectValidator {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            predicate: predicate_for(type_name),
        }
    }

    fn is_instance(&self, value: &Value, args: Option<&TypeArgs>) -> bool {
        if !(self.predicate)(value) {
            return false;
        }
        match args.and_then(|a| a.non_empty_string("ctor")) {
            Some(ctor) if self.type_name == TypeName::ClassObject => value
                .as_object()
                .and_then(|o| o.class.as_deref())
                .is_some_and(|class| class == ctor),
            _ => true,
        }
    }
}

impl TypeValidator for ObjectValidator {
    fn type_name(&self) -> TypeName {
        self.type_name
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

        let shape = args.and_then(|a| a.shape("$"));
        let exact = shape.is_some()
            && args
                .and_then(|a| a.flag("exact"))
                .unwrap_or(context.options.exact_shapes);
        let extra: Vec<String> = match (shape, value.as_object()) {
            (Some(shape), Some(object)) if exact => object
                .props
                .keys()
                .filter(|k| !shape.contains_key(k))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        if !self.is_instance(value, args) || !extra.is_empty() {
            let mut err = mismatch(value, self.type_name, qualifier, args)?;
            if !extra.is_empty() {
                tracing::debug!(?extra, "exact shape found unexpected properties");
                err = err.with_cause(Failure::UnexpectedProperties(extra));
            }
            return Ok(err.into());
        }

        let mut mvv = Object::new();
        if let Some(shape) = shape {
            let props = value.as_object();
            for (prop, prop_ts) in shape.typesets() {
                let child = props.and_then(|o| o.get(prop)).unwrap_or(&UNDEFINED);
                let ctx = context.derive(value, Some(ParentKey::Prop(prop.to_string())));
                match engine.check_in(child, prop_ts, &ctx)? {
                    Verdict::Success(success) => {
                        mvv.props.insert(prop.to_string(), success.mvv);
                    }
                    Verdict::Error(err) => {
                        let typeset = Typeset::Shape(shape.clone());
                        return Ok(err.rewrap(value.clone(), typeset, [prop]).into());
                    }
                }
            }
        }
        Ok(Verdict::success(Value::Object(mvv)))
    }
}
