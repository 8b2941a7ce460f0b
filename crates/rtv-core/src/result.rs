//! # Result Model
//!
//! A check produces a [`Verdict`]: either a success carrying the minimum
//! viable value (MVV), or an [`RtvError`] locating the failure.
//!
//! ## Design
//!
//! - Verdicts are values. Once returned they are never mutated; an outer
//!   level that receives a failing child verdict builds a new error with its
//!   own path segment prepended ([`RtvError::rewrap`]), keeping the child's
//!   `mismatch` and `root_cause` untouched.
//! - The MVV is the original value for primitives and a fresh structural
//!   copy for containers, holding only the children that were checked.

use std::sync::Arc;

use thiserror::Error;

use crate::print::print_value;
use crate::typeset::Typeset;
use crate::value::Value;

/// A successful check.
#[derive(Debug, Clone, PartialEq)]
pub struct RtvSuccess {
    /// The minimum viable value.
    pub mvv: Value,
}

/// Why a value failed beyond a plain type mismatch.
#[derive(Error, Debug, Clone)]
pub enum Failure {
    /// A custom validator returned `false`.
    #[error("Verification failed by the custom validator")]
    ValidatorRejected,

    /// A custom validator returned an error.
    #[error("{0}")]
    Validator(Arc<anyhow::Error>),

    /// An exact shape found properties it does not declare.
    #[error("Found unexpected properties in value: '{}'", .0.join("', '"))]
    UnexpectedProperties(Vec<String>),
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Failure::ValidatorRejected, Failure::ValidatorRejected) => true,
            (Failure::Validator(a), Failure::Validator(b)) => a.to_string() == b.to_string(),
            (Failure::UnexpectedProperties(a), Failure::UnexpectedProperties(b)) => a == b,
            _ => false,
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Validator(Arc::new(err))
    }
}

/// A failed check.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Verification failed: value={}, path=\"/{}\", mismatch={}",
    print_value(.value),
    .path.join("/"),
    .mismatch
)]
pub struct RtvError {
    /// The value that failed at this level.
    pub value: Value,
    /// The typeset (as given, not normalized) used at this level.
    pub typeset: Typeset,
    /// Segments locating the failure, from this level down to the leaf.
    pub path: Vec<String>,
    /// Fully-qualified typeset of the subtype that was being attempted.
    pub mismatch: Typeset,
    /// Underlying failure, if any.
    pub root_cause: Option<Failure>,
}

impl RtvError {
    pub fn new(value: Value, typeset: Typeset, path: Vec<String>, mismatch: Typeset) -> Self {
        Self {
            value,
            typeset,
            path,
            mismatch,
            root_cause: None,
        }
    }

    /// Attaches a root cause.
    pub fn with_cause(mut self, cause: Failure) -> Self {
        self.root_cause = Some(cause);
        self
    }

    /// Builds the error of an enclosing level from `self`: new value and
    /// typeset, `prefix` prepended to the path, mismatch and root cause kept.
    pub fn rewrap<I, S>(&self, value: Value, typeset: Typeset, prefix: I) -> RtvError
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path: Vec<String> = prefix.into_iter().map(Into::into).collect();
        path.extend(self.path.iter().cloned());
        RtvError {
            value,
            typeset,
            path,
            mismatch: self.mismatch.clone(),
            root_cause: self.root_cause.clone(),
        }
    }
}

/// Outcome of a check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Success(RtvSuccess),
    Error(RtvError),
}

impl Verdict {
    /// A success with the given minimum viable value.
    pub fn success(mvv: Value) -> Self {
        Verdict::Success(RtvSuccess { mvv })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Success(_))
    }

    /// The minimum viable value, if the check succeeded.
    pub fn mvv(&self) -> Option<&Value> {
        match self {
            Verdict::Success(s) => Some(&s.mvv),
            Verdict::Error(_) => None,
        }
    }

    /// The failure, if the check failed.
    pub fn error(&self) -> Option<&RtvError> {
        match self {
            Verdict::Success(_) => None,
            Verdict::Error(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<Value, RtvError> {
        match self {
            Verdict::Success(s) => Ok(s.mvv),
            Verdict::Error(e) => Err(e),
        }
    }
}

impl From<RtvError> for Verdict {
    fn from(err: RtvError) -> Self {
        Verdict::Error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeName;

    fn leaf_error() -> RtvError {
        RtvError::new(
            Value::from("x"),
            Typeset::Type(TypeName::Finite),
            vec![],
            crate::typeset!(crate::Qualifier::Required, TypeName::Finite),
        )
    }

    #[test]
    fn test_rewrap_prepends_path() {
        let leaf = leaf_error().with_cause(Failure::ValidatorRejected);
        let outer = leaf.rewrap(Value::Null, Typeset::Type(TypeName::Array), ["1"]);
        let top = outer.rewrap(Value::Null, Typeset::Type(TypeName::Object), ["b"]);
        assert_eq!(top.path, vec!["b", "1"]);
        assert_eq!(top.mismatch, leaf.mismatch);
        assert_eq!(top.root_cause, Some(Failure::ValidatorRejected));
        // the child is untouched
        assert!(leaf.path.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = leaf_error().rewrap(Value::Null, Typeset::Type(TypeName::Array), ["a", "1"]);
        assert_eq!(
            err.to_string(),
            "Verification failed: value=null, path=\"/a/1\", mismatch=[\"!\",\"finite\"]"
        );
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            Failure::ValidatorRejected.to_string(),
            "Verification failed by the custom validator"
        );
        assert_eq!(
            Failure::from(anyhow::anyhow!("bad")).to_string(),
            "bad"
        );
        assert_eq!(
            Failure::UnexpectedProperties(vec!["b".into(), "c".into()]).to_string(),
            "Found unexpected properties in value: 'b', 'c'"
        );
    }

    #[test]
    fn test_verdict_accessors() {
        let ok = Verdict::success(Value::from(1));
        assert!(ok.is_valid());
        assert_eq!(ok.mvv(), Some(&Value::from(1)));
        assert!(ok.error().is_none());

        let bad = Verdict::from(leaf_error());
        assert!(!bad.is_valid());
        assert!(bad.mvv().is_none());
        assert!(bad.into_result().is_err());
    }
}
