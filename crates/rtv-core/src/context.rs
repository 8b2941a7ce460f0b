//! # Validation Context
//!
//! Per-check record threaded through every recursive call: the top-level
//! value under verification, where the current value lives inside its
//! container, and the cross-cutting options of the check.
//!
//! Contexts are immutable. Composite validators call [`Context::derive`] to
//! obtain a fresh context for each child; the original value and the options
//! are carried over unchanged.

use serde::{Deserialize, Serialize};

use crate::error::TypesetError;
use crate::predicate::is_any_object;
use crate::value::Value;

/// Cross-cutting options of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckOptions {
    /// Reject object properties not declared in the shape, unless the
    /// object type's arguments say otherwise with `exact`.
    pub exact_shapes: bool,
}

/// Where a value lives inside its parent container.
#[derive(Debug, Clone, PartialEq)]
pub enum ParentKey {
    /// Array index.
    Index(usize),
    /// Object property.
    Prop(String),
    /// Map key (the key value itself).
    Key(Value),
}

/// The context of one check call.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    /// The top-level value, constant across a verification tree.
    pub original_value: &'a Value,
    /// The container holding the value being checked, if any.
    pub parent: Option<&'a Value>,
    /// The value's key within `parent`. Map keys and set elements being
    /// checked themselves have a parent but no key.
    pub parent_key: Option<ParentKey>,
    /// Options of the check.
    pub options: CheckOptions,
}

impl<'a> Context<'a> {
    /// The context of a top-level check of `value`.
    pub fn root(value: &'a Value) -> Self {
        Self {
            original_value: value,
            parent: None,
            parent_key: None,
            options: CheckOptions::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// A context for a child of `parent` found at `key`.
    pub fn derive(&self, parent: &'a Value, key: Option<ParentKey>) -> Context<'a> {
        Context {
            original_value: self.original_value,
            parent: Some(parent),
            parent_key: key,
            options: self.options,
        }
    }

    /// Checks internal consistency: a parent must not be a primitive.
    pub fn validate(&self) -> Result<(), TypesetError> {
        match self.parent {
            Some(parent) if !is_any_object(parent) => Err(TypesetError::InvalidContext(format!(
                "parent must be an object-like value, found {}",
                parent.kind()
            ))),
            None if self.parent_key.is_some() => Err(TypesetError::InvalidContext(
                "parent_key given without a parent".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
