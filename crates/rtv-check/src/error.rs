//! # Verification Errors
//!
//! [`VerifyError`] joins the two failure classes for callers that want a
//! single `Result`: the typeset was unusable, or the value did not comply.

use rtv_core::{RtvError, TypesetError};
use thiserror::Error;

/// Failure of [`crate::Engine::verify`].
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The typeset, context or registry is unusable.
    #[error(transparent)]
    Typeset(#[from] TypesetError),

    /// The value does not comply with the typeset.
    #[error(transparent)]
    Mismatch(Box<RtvError>),
}

impl VerifyError {
    /// The verification failure, if the value was the problem.
    pub fn mismatch(&self) -> Option<&RtvError> {
        match self {
            VerifyError::Mismatch(err) => Some(err),
            VerifyError::Typeset(_) => None,
        }
    }
}

impl From<RtvError> for VerifyError {
    fn from(err: RtvError) -> Self {
        VerifyError::Mismatch(Box::new(err))
    }
}
