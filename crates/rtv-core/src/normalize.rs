//! # Normalizer
//!
//! Canonical forms of typesets and the iteration over the alternatives of a
//! list typeset.
//!
//! The canonical, *fully-qualified* form of a typeset is a list that starts
//! with exactly one qualifier, followed by types (each optionally followed by
//! its arguments) and an optional trailing custom validator:
//!
//! ```text
//! [qualifier, type, args?, type, args?, ..., validator?]
//! ```
//!
//! Normalization is shallow: a bare shape becomes `[q, OBJECT, {$: shape}]`,
//! a bare validator becomes `[q, ANY, validator]`, and a nested list becomes
//! `[..., ARRAY, {$: nested}]` without the nested list itself being touched.

use crate::args::TypeArgs;
use crate::error::TypesetError;
use crate::grammar::{verify_typeset, GrammarOptions};
use crate::qualifier::Qualifier;
use crate::typeset::{Rule, Typeset};
use crate::types::TypeName;

/// The qualifier at the root of `typeset`, or [`Qualifier::DEFAULT`].
pub fn get_qualifier(typeset: &Typeset) -> Qualifier {
    match typeset {
        Typeset::List(rules) => match rules.first() {
            Some(Rule::Qualifier(q)) => *q,
            _ => Qualifier::DEFAULT,
        },
        _ => Qualifier::DEFAULT,
    }
}

/// Builds a typeset from its parts.
///
/// With `fully_qualified`, the result is always `[qualifier, type, args?]`.
/// Otherwise the shortest equivalent form is produced: a bare type when the
/// qualifier is the default and there are no arguments.
pub fn to_typeset(
    type_name: TypeName,
    qualifier: Option<Qualifier>,
    args: Option<&TypeArgs>,
    fully_qualified: bool,
) -> Result<Typeset, TypesetError> {
    if args.is_some() && !type_name.has_args() {
        return Err(TypesetError::ArgsNotAccepted(type_name));
    }
    let qualifier = qualifier.unwrap_or_default();

    if !fully_qualified && qualifier == Qualifier::DEFAULT && args.is_none() {
        return Ok(Typeset::Type(type_name));
    }

    let mut rules = Vec::with_capacity(3);
    if fully_qualified || qualifier != Qualifier::DEFAULT {
        rules.push(Rule::Qualifier(qualifier));
    }
    rules.push(Rule::Type(type_name));
    if let Some(args) = args {
        rules.push(Rule::Args(args.clone()));
    }
    Ok(Typeset::List(rules))
}

/// Produces the fully-qualified form of `typeset`.
///
/// `qualifier`, when given, replaces the typeset's own qualifier.
pub fn fully_qualify(
    typeset: &Typeset,
    qualifier: Option<Qualifier>,
) -> Result<Typeset, TypesetError> {
    verify_typeset(typeset, GrammarOptions::shallow())?;
    Ok(fully_qualify_verified(typeset, qualifier))
}

/// [`fully_qualify`] for a typeset that already passed the shallow grammar,
/// such as a subtype produced by [`Subtypes`] from a verified list.
pub fn fully_qualify_verified(typeset: &Typeset, qualifier: Option<Qualifier>) -> Typeset {
    let rules = match typeset {
        Typeset::Type(t) => vec![
            Rule::Qualifier(qualifier.unwrap_or_default()),
            Rule::Type(*t),
        ],
        Typeset::Shape(shape) => vec![
            Rule::Qualifier(qualifier.unwrap_or_default()),
            Rule::Type(TypeName::DEFAULT_OBJECT_TYPE),
            Rule::Args(TypeArgs::new().with("$", shape.clone())),
        ],
        Typeset::Validator(v) => vec![
            Rule::Qualifier(qualifier.unwrap_or_default()),
            Rule::Type(TypeName::Any),
            Rule::Validator(v.clone()),
        ],
        Typeset::List(rules) => fully_qualify_list(rules, qualifier),
    };
    Typeset::List(rules)
}

fn fully_qualify_list(rules: &[Rule], qualifier: Option<Qualifier>) -> Vec<Rule> {
    let mut out = Vec::with_capacity(rules.len() + 2);
    let mut has_type = false;

    for (index, rule) in rules.iter().enumerate() {
        if index == 0 {
            if let Rule::Qualifier(own) = rule {
                out.push(Rule::Qualifier(qualifier.unwrap_or(*own)));
                continue;
            }
            out.push(Rule::Qualifier(qualifier.unwrap_or_default()));
        }

        match rule {
            Rule::Type(t) => {
                has_type = true;
                out.push(Rule::Type(*t));
            }
            Rule::Shape(shape) => {
                has_type = true;
                out.push(Rule::Type(TypeName::DEFAULT_OBJECT_TYPE));
                out.push(Rule::Args(TypeArgs::new().with("$", shape.clone())));
            }
            Rule::List(nested) => {
                has_type = true;
                out.push(Rule::Type(TypeName::Array));
                out.push(Rule::Args(
                    TypeArgs::new().with("$", Typeset::List(nested.clone())),
                ));
            }
            Rule::Args(args) => out.push(Rule::Args(args.clone())),
            Rule::Validator(v) => {
                if !has_type {
                    has_type = true;
                    out.push(Rule::Type(TypeName::Any));
                }
                out.push(Rule::Validator(v.clone()));
            }
            // only possible at index 0, handled above
            Rule::Qualifier(_) => {}
        }
    }
    out
}

/// How [`extract_next_type`] treats qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierMode {
    /// Keep a leading qualifier if the list has one.
    Include,
    /// Drop a leading qualifier.
    Exclude,
    /// Keep a leading qualifier, or add this one if the list has none.
    Default(Qualifier),
}

/// Takes the next complete single-type unit (qualifier?, type, args?) from
/// `rules` starting at `cursor`, and advances the cursor past it.
///
/// Shapes, nested lists and validators form units on their own. Returns an
/// empty vector once the rules are exhausted.
pub fn extract_next_type(rules: &[Rule], cursor: &mut usize, mode: QualifierMode) -> Vec<Rule> {
    let Some(mut rule) = rules.get(*cursor) else {
        return Vec::new();
    };
    *cursor += 1;

    let mut subtype = Vec::with_capacity(3);
    if rule.is_qualifier() {
        if mode != QualifierMode::Exclude {
            subtype.push(rule.clone());
        }
        match rules.get(*cursor) {
            Some(next) => {
                rule = next;
                *cursor += 1;
            }
            None => return subtype,
        }
    } else if let QualifierMode::Default(q) = mode {
        subtype.push(Rule::Qualifier(q));
    }

    subtype.push(rule.clone());
    if let Rule::Type(t) = rule {
        if t.has_args() {
            if let Some(args @ Rule::Args(_)) = rules.get(*cursor) {
                subtype.push(args.clone());
                *cursor += 1;
            }
        }
    }
    subtype
}

/// A restartable iterator over the single-type units of a list typeset.
///
/// The typeset is validated once, when the iterator is created; iteration
/// never modifies it.
#[derive(Debug, Clone)]
pub struct Subtypes<'t> {
    rules: &'t [Rule],
    cursor: usize,
    mode: QualifierMode,
}

impl<'t> Subtypes<'t> {
    /// Iterates the units of `typeset`, which must be a valid list.
    pub fn new(typeset: &'t Typeset, mode: QualifierMode) -> Result<Self, TypesetError> {
        verify_typeset(typeset, GrammarOptions::shallow())?;
        match typeset {
            Typeset::List(rules) => Ok(Self::unchecked(rules, mode)),
            other => Err(TypesetError::ListRequired(other.to_string())),
        }
    }

    /// Iterates `rules` without validating them first.
    pub fn unchecked(rules: &'t [Rule], mode: QualifierMode) -> Self {
        Self {
            rules,
            cursor: 0,
            mode,
        }
    }

    /// Rewinds to the first unit.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// Whether every unit has been produced.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.rules.len()
    }
}

impl Iterator for Subtypes<'_> {
    type Item = Vec<Rule>;

    fn next(&mut self) -> Option<Self::Item> {
        let subtype = extract_next_type(self.rules, &mut self.cursor, self.mode);
        if subtype.is_empty() {
            None
        } else {
            Some(subtype)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::typeset::{CustomValidator, Shape};
    use proptest::prelude::*;

    fn arb_type() -> impl Strategy<Value = TypeName> {
        proptest::sample::select(TypeName::all().to_vec())
    }

    fn arb_qualifier() -> impl Strategy<Value = Qualifier> {
        proptest::sample::select(Qualifier::all().to_vec())
    }

    fn arb_args() -> impl Strategy<Value = TypeArgs> {
        (0..5i64).prop_map(|n| TypeArgs::new().with("min", n))
    }

    /// Valid typesets without custom validators (which compare by identity).
    fn arb_typeset() -> impl Strategy<Value = Typeset> {
        let leaf = arb_type().prop_map(Typeset::Type);
        leaf.prop_recursive(3, 24, 4, |inner| {
            let shape = proptest::collection::vec(("[a-z]{1,4}", inner.clone()), 0..3)
                .prop_map(|props| Typeset::Shape(props.into_iter().collect::<Shape>()));
            let unit = prop_oneof![
                (arb_type(), proptest::option::of(arb_args())).prop_map(|(t, args)| {
                    let mut rules = vec![Rule::Type(t)];
                    if let Some(args) = args.filter(|_| t.has_args()) {
                        rules.push(Rule::Args(args));
                    }
                    rules
                }),
                inner.prop_map(|ts| match ts {
                    Typeset::List(rules) => vec![Rule::List(rules)],
                    other => vec![Rule::List(vec![Rule::from(other)])],
                }),
            ];
            let list = (
                proptest::option::of(arb_qualifier()),
                proptest::collection::vec(unit, 1..4),
            )
                .prop_map(|(q, units)| {
                    let mut rules: Vec<Rule> = q.map(Rule::Qualifier).into_iter().collect();
                    rules.extend(units.into_iter().flatten());
                    Typeset::List(rules)
                });
            prop_oneof![shape, list]
        })
    }

    proptest! {
        #[test]
        fn fully_qualify_is_idempotent(ts in arb_typeset()) {
            let once = fully_qualify(&ts, None).unwrap();
            let twice = fully_qualify(&once, None).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn verified_form_matches_checked_form(
            ts in arb_typeset(),
            q in proptest::option::of(arb_qualifier()),
        ) {
            prop_assert_eq!(fully_qualify_verified(&ts, q), fully_qualify(&ts, q).unwrap());
        }

        #[test]
        fn fully_qualified_output_passes_fully_qualified_grammar(ts in arb_typeset()) {
            let fq = fully_qualify(&ts, None).unwrap();
            prop_assert!(crate::grammar::is_typeset(&fq, GrammarOptions::shallow().fully_qualified()));
        }

        #[test]
        fn fully_qualify_keeps_own_qualifier(ts in arb_typeset()) {
            let fq = fully_qualify(&ts, None).unwrap();
            prop_assert_eq!(get_qualifier(&fq), get_qualifier(&ts));
        }

        #[test]
        fn override_qualifier_wins(ts in arb_typeset(), q in arb_qualifier()) {
            let fq = fully_qualify(&ts, Some(q)).unwrap();
            prop_assert_eq!(get_qualifier(&fq), q);
        }

        #[test]
        fn to_typeset_roundtrip(t in arb_type(), q in arb_qualifier(), args in proptest::option::of(arb_args())) {
            let args = args.filter(|_| t.has_args());
            let ts = to_typeset(t, Some(q), args.as_ref(), false).unwrap();
            prop_assert_eq!(get_qualifier(&ts), q);
            let fq = to_typeset(t, Some(q), args.as_ref(), true).unwrap();
            prop_assert_eq!(fully_qualify(&fq, None).unwrap(), fq);
        }

        #[test]
        fn lone_validator_lists_normalize_to_any(q in arb_qualifier()) {
            let v = CustomValidator::from_fn(|_| true);
            let fq = fully_qualify(&crate::typeset![q, v.clone()], None).unwrap();
            prop_assert_eq!(fq, crate::typeset![q, TypeName::Any, v]);
        }
    }
}
