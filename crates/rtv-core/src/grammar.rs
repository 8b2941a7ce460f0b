//! # Typeset Grammar
//!
//! Structural validation of typesets, in two strengths:
//!
//! - *shallow* (default): the rules of the top-level list only.
//! - *deep*: the same rules applied to every nested shape, list and typeset
//!   argument (`$`, `$keys`, `$values`) in the tree.
//!
//! Either strength can additionally demand the *fully-qualified* form, in
//! which every list starts with a qualifier, shorthand shapes and nested
//! lists are not allowed, and a custom validator needs an explicit type.
//!
//! ## List rules
//!
//! 1. A list is not empty.
//! 2. A qualifier may only appear at index 0.
//! 3. A shape may only appear at index 0, or at index 1 after a qualifier.
//! 4. Arguments directly follow a type that accepts arguments, at most once
//!    per type.
//! 5. At most one custom validator, and only as the last element.
//! 6. At least one type. Outside fully-qualified mode, a custom validator on
//!    its own implies `ANY`.
//!
//! The module also hosts [`lint`], which reports typesets that are valid but
//! probably not what their author meant.

use crate::args::{ArgValue, TypeArgs};
use crate::error::{GrammarError, TypesetError};
use crate::typeset::{Rule, Shape, Typeset};
use crate::types::TypeName;

/// How strictly to validate a typeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrammarOptions {
    /// Validate nested typesets too.
    pub deep: bool,
    /// Require the fully-qualified form.
    pub fully_qualified: bool,
}

impl GrammarOptions {
    pub fn shallow() -> Self {
        Self::default()
    }

    pub fn deep() -> Self {
        Self {
            deep: true,
            fully_qualified: false,
        }
    }

    pub fn fully_qualified(mut self) -> Self {
        self.fully_qualified = true;
        self
    }
}

/// Validates `typeset` against the typeset grammar.
pub fn validate_typeset(typeset: &Typeset, options: GrammarOptions) -> Result<(), GrammarError> {
    match typeset {
        Typeset::Type(_) | Typeset::Validator(_) if options.fully_qualified => {
            Err(GrammarError::QualifierRequired)
        }
        Typeset::Type(_) | Typeset::Validator(_) => Ok(()),
        Typeset::Shape(_) if options.fully_qualified => Err(GrammarError::QualifierRequired),
        Typeset::Shape(shape) => {
            if options.deep {
                validate_shape(shape, options)
            } else {
                Ok(())
            }
        }
        Typeset::List(rules) => validate_list(rules, options),
    }
}

/// Whether `typeset` satisfies the grammar.
pub fn is_typeset(typeset: &Typeset, options: GrammarOptions) -> bool {
    validate_typeset(typeset, options).is_ok()
}

/// Whether a JSON document is a typeset satisfying the grammar.
pub fn is_typeset_json(candidate: &serde_json::Value, options: GrammarOptions) -> bool {
    Typeset::classify(candidate)
        .map(|ts| is_typeset(&ts, options))
        .unwrap_or(false)
}

/// Validates `typeset`, converting a violation into a [`TypesetError`].
pub fn verify_typeset(typeset: &Typeset, options: GrammarOptions) -> Result<(), TypesetError> {
    validate_typeset(typeset, options).map_err(|reason| TypesetError::Invalid {
        typeset: typeset.to_string(),
        reason,
    })
}

/// What is "in scope" while walking a list: the last type-like element.
enum Scope {
    None,
    Type { type_name: TypeName, has_args: bool },
    Implied,
}

fn validate_list(rules: &[Rule], options: GrammarOptions) -> Result<(), GrammarError> {
    let first = rules.first().ok_or(GrammarError::EmptyList)?;
    let has_qualifier = first.is_qualifier();
    if options.fully_qualified && !has_qualifier {
        return Err(GrammarError::QualifierRequired);
    }

    let mut scope = Scope::None;
    let mut type_count = 0usize;
    let mut validator_at: Option<usize> = None;

    for (index, rule) in rules.iter().enumerate() {
        if let Some(at) = validator_at {
            return Err(if rule.is_validator() {
                GrammarError::MultipleValidators { index }
            } else {
                GrammarError::MisplacedValidator { index: at }
            });
        }

        match rule {
            Rule::Qualifier(_) => {
                if index != 0 {
                    return Err(GrammarError::MisplacedQualifier { index });
                }
            }
            Rule::Type(type_name) => {
                scope = Scope::Type {
                    type_name: *type_name,
                    has_args: false,
                };
                type_count += 1;
            }
            Rule::Args(args) => match &mut scope {
                Scope::Type {
                    type_name,
                    has_args,
                } if !*has_args => {
                    let type_name = *type_name;
                    if !type_name.has_args() {
                        return Err(GrammarError::ArgsNotAccepted { index, type_name });
                    }
                    *has_args = true;
                    if options.deep {
                        validate_args(type_name, args, options)
                            .map_err(|e| e.nested(format!("index={index}")))?;
                    }
                }
                _ => return Err(GrammarError::ArgsWithoutType { index }),
            },
            Rule::Shape(shape) => {
                let leading = index == 0 || (index == 1 && has_qualifier);
                if !leading {
                    return Err(GrammarError::MisplacedShape { index });
                }
                if options.fully_qualified {
                    return Err(GrammarError::ShorthandNotAllowed { index, form: "shape" });
                }
                if options.deep {
                    validate_shape(shape, options)
                        .map_err(|e| e.nested(format!("index={index}")))?;
                }
                scope = Scope::Implied;
                type_count += 1;
            }
            Rule::List(nested) => {
                if options.fully_qualified {
                    return Err(GrammarError::ShorthandNotAllowed { index, form: "array" });
                }
                if options.deep {
                    validate_list(nested, options)
                        .map_err(|e| e.nested(format!("index={index}")))?;
                }
                scope = Scope::Implied;
                type_count += 1;
            }
            Rule::Validator(_) => {
                if options.fully_qualified && type_count == 0 {
                    return Err(GrammarError::MissingType);
                }
                validator_at = Some(index);
            }
        }
    }

    if type_count == 0 && validator_at.is_none() {
        return Err(if has_qualifier && rules.len() == 1 {
            GrammarError::QualifierOnly
        } else {
            GrammarError::MissingType
        });
    }
    Ok(())
}

fn validate_shape(shape: &Shape, options: GrammarOptions) -> Result<(), GrammarError> {
    for (prop, ts) in shape.typesets() {
        validate_typeset(ts, options).map_err(|e| e.nested(format!("prop=\"{prop}\"")))?;
    }
    Ok(())
}

fn validate_args(
    type_name: TypeName,
    args: &TypeArgs,
    options: GrammarOptions,
) -> Result<(), GrammarError> {
    if type_name.is_object_type() {
        if let Some(arg) = args.get("$") {
            match arg {
                ArgValue::Typeset(Typeset::Shape(shape)) => {
                    validate_shape(shape, options).map_err(|e| e.nested("args.$"))?;
                }
                _ => return Err(GrammarError::InvalidShapeArg(type_name)),
            }
        }
        return Ok(());
    }

    let keys: &[&str] = match type_name {
        TypeName::Array => &["$"],
        TypeName::Map => &["$keys", "$values"],
        TypeName::HashMap | TypeName::Set => &["$values"],
        _ => &[],
    };
    for key in keys {
        match args.get(key) {
            None => {}
            Some(ArgValue::Typeset(ts)) => {
                validate_typeset(ts, options).map_err(|e| e.nested(format!("args.{key}")))?;
            }
            Some(ArgValue::Data(_)) => {
                return Err(GrammarError::InvalidTypesetArg {
                    key: key.to_string(),
                    type_name,
                })
            }
        }
    }
    Ok(())
}

/// A typeset that is valid but probably not what its author meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    /// Location within the typeset; empty for the root.
    pub location: Vec<String>,
    /// What looks wrong.
    pub message: String,
}

impl std::fmt::Display for LintWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.location.join("/"), self.message)
        }
    }
}

/// Reports arguments the preceding type never reads. An unread argument
/// whose value is itself a typeset usually means a shape was written after
/// a type, where it is read as that type's arguments instead.
pub fn lint(typeset: &Typeset) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    lint_typeset(typeset, &mut Vec::new(), &mut warnings);
    warnings
}

fn lint_typeset(ts: &Typeset, location: &mut Vec<String>, out: &mut Vec<LintWarning>) {
    match ts {
        Typeset::Type(_) | Typeset::Validator(_) => {}
        Typeset::Shape(shape) => lint_shape(shape, location, out),
        Typeset::List(rules) => lint_list(rules, location, out),
    }
}

fn lint_shape(shape: &Shape, location: &mut Vec<String>, out: &mut Vec<LintWarning>) {
    for (prop, ts) in shape.typesets() {
        location.push(prop.to_string());
        lint_typeset(ts, location, out);
        location.pop();
    }
}

fn lint_list(rules: &[Rule], location: &mut Vec<String>, out: &mut Vec<LintWarning>) {
    let mut current: Option<TypeName> = None;
    for (index, rule) in rules.iter().enumerate() {
        location.push(format!("index={index}"));
        match rule {
            Rule::Type(t) => current = Some(*t),
            Rule::Args(args) => {
                if let Some(type_name) = current {
                    lint_args(type_name, args, location, out);
                }
            }
            Rule::Shape(shape) => lint_shape(shape, location, out),
            Rule::List(nested) => lint_list(nested, location, out),
            Rule::Qualifier(_) | Rule::Validator(_) => {}
        }
        location.pop();
    }
}

fn lint_args(
    type_name: TypeName,
    args: &TypeArgs,
    location: &mut Vec<String>,
    out: &mut Vec<LintWarning>,
) {
    let known = type_name.arg_names();
    for (key, value) in args.iter() {
        if !known.contains(&key) {
            let looks_like_typeset = match value {
                ArgValue::Typeset(_) => true,
                ArgValue::Data(d) => Typeset::classify(d).is_ok(),
            };
            let message = if looks_like_typeset {
                format!(
                    "argument \"{key}\" of type=\"{type_name}\" looks like a typeset; a shape is only \
                     recognized at index 0 or directly after the qualifier, elsewhere it is read as type args"
                )
            } else {
                format!("argument \"{key}\" is not read by type=\"{type_name}\"")
            };
            out.push(LintWarning {
                location: location.clone(),
                message,
            });
        } else if let ArgValue::Typeset(ts) = value {
            location.push(format!("args.{key}"));
            lint_typeset(ts, location, out);
            location.pop();
        }
    }
}
