//! # Matching Engine
//!
//! Dispatches a value against a typeset and assembles the verdict.
//!
//! ## Dispatch
//!
//! | Typeset form | Handled by |
//! |--------------|------------|
//! | bare type | [`Engine::check_with_type`] |
//! | bare custom validator | implied `ANY`, then the validator |
//! | bare shape | [`Engine::check_with_shape`] (default object type) |
//! | list | [`Engine::check_with_array`] |
//!
//! A list is an ordered set of alternatives tried left to right. The first
//! alternative that matches wins and the rest are never tried. When a list
//! holds a single alternative, its detailed failure is propagated; with
//! several alternatives a generic failure against the whole list is
//! reported, since no single alternative is to blame.
//!
//! ## Registry
//!
//! The engine owns its validators. A validator receives the engine by
//! reference while it validates, which is how composite validators recurse
//! into child values. [`Engine::standard`] registers every standard validator
//! in one explicit pass; after that the engine is only read, so a single
//! engine can be shared across threads.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rtv_core::{
    extract_next_type, fully_qualify_verified, get_qualifier, verify_typeset, CheckOptions,
    Context, CustomValidator, Failure, GrammarOptions, Qualifier, QualifierMode, RtvError, Rule,
    Shape, Subtypes, TypeArgs, TypeName, Typeset, TypesetError, Value, Verdict,
};

use crate::error::VerifyError;
use crate::validator::{self, TypeValidator};

/// The matching engine and its validator registry.
#[derive(Clone)]
pub struct Engine {
    validators: HashMap<TypeName, Arc<dyn TypeValidator>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("types", &self.registered_types())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::standard()
    }
}

impl Engine {
    /// An engine with no validators registered.
    pub fn new() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// An engine with every standard validator registered.
    pub fn standard() -> Self {
        let mut engine = Self::new();
        for validator in validator::standard_validators() {
            engine.register_type(validator);
        }
        engine
    }

    /// Registers `validator` for its type, returning the validator it
    /// replaces. The last registration for a type wins.
    pub fn register_type(
        &mut self,
        validator: Arc<dyn TypeValidator>,
    ) -> Option<Arc<dyn TypeValidator>> {
        let type_name = validator.type_name();
        let previous = self.validators.insert(type_name, validator);
        tracing::debug!(
            %type_name,
            replaced = previous.is_some(),
            "registered type validator"
        );
        previous
    }

    /// The validator registered for `type_name`.
    pub fn validator(&self, type_name: TypeName) -> Option<&Arc<dyn TypeValidator>> {
        self.validators.get(&type_name)
    }

    /// Types with a registered validator, sorted by type.
    pub fn registered_types(&self) -> Vec<TypeName> {
        let mut types: Vec<TypeName> = self.validators.keys().copied().collect();
        types.sort();
        types
    }

    /// Checks `value` against `typeset` as a top-level value.
    ///
    /// Returns `Err` only for programmer errors: an invalid typeset, or a
    /// type with no registered validator. A non-compliant value is an
    /// `Ok(Verdict::Error)`.
    pub fn check(&self, value: &Value, typeset: &Typeset) -> Result<Verdict, TypesetError> {
        self.check_in(value, typeset, &Context::root(value))
    }

    /// [`Engine::check`] with explicit options.
    pub fn check_with_options(
        &self,
        value: &Value,
        typeset: &Typeset,
        options: CheckOptions,
    ) -> Result<Verdict, TypesetError> {
        self.check_in(value, typeset, &Context::root(value).with_options(options))
    }

    /// Checks `value` against `typeset` within an existing context. This is
    /// the entry point composite validators use for child values.
    pub fn check_in<'a>(
        &self,
        value: &'a Value,
        typeset: &Typeset,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        context.validate()?;
        verify_typeset(typeset, GrammarOptions::shallow())?;
        self.check_validated(value, typeset, context)
    }

    /// [`Engine::check_in`] for a typeset that already passed the grammar.
    fn check_validated<'a>(
        &self,
        value: &'a Value,
        typeset: &Typeset,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        match typeset {
            Typeset::Type(_) | Typeset::Shape(_) => self.match_type(value, typeset, context, None),
            Typeset::Validator(validator) => {
                self.match_validator(value, typeset, validator, context)
            }
            Typeset::List(rules) => self.match_alternatives(value, typeset, rules, context, None),
        }
    }

    /// Checks `value` against a typeset describing exactly one type: a bare
    /// type, a shape, or a list such as `[q, type, args]`.
    ///
    /// `qualifier` overrides the typeset's own qualifier.
    pub fn check_with_type<'a>(
        &self,
        value: &'a Value,
        single_type: &Typeset,
        context: &Context<'a>,
        qualifier: Option<Qualifier>,
    ) -> Result<Verdict, TypesetError> {
        context.validate()?;
        verify_typeset(single_type, GrammarOptions::shallow())?;
        self.match_type(value, single_type, context, qualifier)
    }

    /// Checks `value` against `shape` with the default object type.
    pub fn check_with_shape<'a>(
        &self,
        value: &'a Value,
        shape: &Shape,
        context: &Context<'a>,
        qualifier: Option<Qualifier>,
    ) -> Result<Verdict, TypesetError> {
        context.validate()?;
        self.match_type(value, &Typeset::Shape(shape.clone()), context, qualifier)
    }

    /// Checks `value` against the alternatives of a list typeset.
    ///
    /// `qualifier` overrides the typeset's own qualifier.
    pub fn check_with_array<'a>(
        &self,
        value: &'a Value,
        typeset: &Typeset,
        context: &Context<'a>,
        qualifier: Option<Qualifier>,
    ) -> Result<Verdict, TypesetError> {
        context.validate()?;
        let rules = typeset
            .as_list()
            .ok_or_else(|| TypesetError::ListRequired(typeset.to_string()))?;
        verify_typeset(typeset, GrammarOptions::shallow())?;
        self.match_alternatives(value, typeset, rules, context, qualifier)
    }

    /// Checks `value` and returns its minimum viable value, or the failure
    /// as an error.
    pub fn verify(&self, value: &Value, typeset: &Typeset) -> Result<Value, VerifyError> {
        Ok(self.check(value, typeset)?.into_result()?)
    }

    /// Runs a custom validator. Returns the failure if the validator rejected
    /// the value or returned an error.
    pub fn call_custom_validator(
        &self,
        validator: &CustomValidator,
        value: &Value,
        matched: &Typeset,
        typeset: &Typeset,
        context: &Context<'_>,
    ) -> Result<Option<Failure>, TypesetError> {
        context.validate()?;
        match validator.call(value, matched, typeset, context) {
            Ok(true) => Ok(None),
            Ok(false) => {
                tracing::debug!(%matched, "custom validator rejected value");
                Ok(Some(Failure::ValidatorRejected))
            }
            Err(err) => {
                tracing::debug!(%matched, error = %err, "custom validator failed");
                Ok(Some(Failure::from(err)))
            }
        }
    }

    fn match_type<'a>(
        &self,
        value: &'a Value,
        single_type: &Typeset,
        context: &Context<'a>,
        qualifier: Option<Qualifier>,
    ) -> Result<Verdict, TypesetError> {
        let qualifier = qualifier.unwrap_or_else(|| get_qualifier(single_type));

        match single_type {
            Typeset::Type(type_name) => {
                self.run_validator(value, single_type, *type_name, qualifier, None, context)
            }
            Typeset::Shape(shape) => {
                let args = TypeArgs::new().with("$", shape.clone());
                self.run_validator(
                    value,
                    single_type,
                    TypeName::DEFAULT_OBJECT_TYPE,
                    qualifier,
                    Some(&args),
                    context,
                )
            }
            Typeset::List(_) => {
                let qualified = fully_qualify_verified(single_type, Some(qualifier));
                let rules = qualified.as_list().unwrap_or_default();
                let mut cursor = 0;
                let unit = extract_next_type(rules, &mut cursor, QualifierMode::Exclude);
                if cursor < rules.len() {
                    return Err(TypesetError::NotSingleType(single_type.to_string()));
                }
                match unit.as_slice() {
                    [Rule::Type(type_name)] => {
                        self.run_validator(value, single_type, *type_name, qualifier, None, context)
                    }
                    [Rule::Type(type_name), Rule::Args(args)] => self.run_validator(
                        value,
                        single_type,
                        *type_name,
                        qualifier,
                        Some(args),
                        context,
                    ),
                    _ => Err(TypesetError::NotSingleType(single_type.to_string())),
                }
            }
            Typeset::Validator(_) => Err(TypesetError::NotSingleType(single_type.to_string())),
        }
    }

    fn run_validator<'a>(
        &self,
        value: &'a Value,
        typeset: &Typeset,
        type_name: TypeName,
        qualifier: Qualifier,
        args: Option<&TypeArgs>,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        let validator = self
            .validators
            .get(&type_name)
            .ok_or(TypesetError::MissingValidator(type_name))?;

        tracing::trace!(%type_name, %qualifier, "running type validator");
        match validator.validate(self, value, qualifier, args, context)? {
            Verdict::Error(err) => Ok(err
                .rewrap(value.clone(), typeset.clone(), std::iter::empty::<String>())
                .into()),
            success => Ok(success),
        }
    }

    fn match_validator<'a>(
        &self,
        value: &'a Value,
        typeset: &Typeset,
        validator: &CustomValidator,
        context: &Context<'a>,
    ) -> Result<Verdict, TypesetError> {
        let implied = Typeset::Type(TypeName::Any);
        let verdict = self.match_type(value, &implied, context, None)?;
        if !verdict.is_valid() {
            return Ok(verdict);
        }

        let matched = fully_qualify_verified(&implied, None);
        match self.call_custom_validator(validator, value, &matched, typeset, context)? {
            None => Ok(verdict),
            Some(failure) => Ok(RtvError::new(
                value.clone(),
                typeset.clone(),
                Vec::new(),
                fully_qualify_verified(typeset, None),
            )
            .with_cause(failure)
            .into()),
        }
    }

    fn match_alternatives<'a>(
        &self,
        value: &'a Value,
        typeset: &Typeset,
        rules: &[Rule],
        context: &Context<'a>,
        qualifier: Option<Qualifier>,
    ) -> Result<Verdict, TypesetError> {
        let qualifier = qualifier.unwrap_or_else(|| get_qualifier(typeset));
        // `[validator]` and `[q, validator]` imply ANY
        let validator_implies_any = matches!(
            rules,
            [Rule::Validator(_)] | [Rule::Qualifier(_), Rule::Validator(_)]
        );

        let mut subtypes = Subtypes::unchecked(rules, QualifierMode::Exclude);
        let mut is_single_type: Option<bool> = None;
        let mut matched: Option<(Typeset, Value)> = None;
        let mut single_failure: Option<RtvError> = None;

        while let Some(unit) = subtypes.next() {
            let single = *is_single_type.get_or_insert(subtypes.is_exhausted());

            if let [Rule::Validator(_)] = unit.as_slice() {
                // the validator is always last: no alternative matched, unless
                // it stands alone
                if validator_implies_any {
                    let any = Typeset::Type(TypeName::Any);
                    matched = Some((fully_qualify_verified(&any, Some(qualifier)), value.clone()));
                }
                break;
            }

            let subtype = Typeset::List(unit);
            match self.match_type(value, &subtype, context, Some(qualifier))? {
                Verdict::Success(success) => {
                    tracing::trace!(%subtype, "alternative matched");
                    let qualified = fully_qualify_verified(&subtype, Some(qualifier));
                    matched = Some((qualified, success.mvv));
                    break;
                }
                Verdict::Error(err) => {
                    tracing::trace!(%subtype, "alternative did not match");
                    if single {
                        single_failure = Some(err);
                    }
                }
            }
        }

        let Some((matched, mvv)) = matched else {
            let err = match single_failure {
                Some(child) => {
                    child.rewrap(value.clone(), typeset.clone(), std::iter::empty::<String>())
                }
                None => RtvError::new(
                    value.clone(),
                    typeset.clone(),
                    Vec::new(),
                    fully_qualify_verified(typeset, Some(qualifier)),
                ),
            };
            return Ok(err.into());
        };

        if let Some(Rule::Validator(validator)) = rules.last() {
            if let Some(failure) =
                self.call_custom_validator(validator, value, &matched, typeset, context)?
            {
                return Ok(RtvError::new(
                    value.clone(),
                    typeset.clone(),
                    Vec::new(),
                    fully_qualify_verified(typeset, Some(qualifier)),
                )
                .with_cause(failure)
                .into());
            }
        }

        Ok(Verdict::success(mvv))
    }
}
