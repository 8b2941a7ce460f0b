//! # Qualifiers — Absent-Value Semantics
//!
//! A qualifier decides whether an absent value (`undefined`, `null`, or for
//! [`Qualifier::Truthy`] any falsy value) is acceptable without running the
//! type-specific checks at all. Every per-type validator consults
//! [`Qualifier::permits`] before doing anything else, which is how "a null
//! EXPECTED value of any type is valid" works uniformly.
//!
//! | Qualifier | Symbol | Permits |
//! |-----------|--------|---------|
//! | `Required` | `!` | nothing |
//! | `Expected` | `+` | `null` |
//! | `Optional` | `?` | `null`, `undefined` |
//! | `Truthy` | `-` | every falsy value (`undefined`, `null`, `false`, `0`, `NaN`, `""`) |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TypesetError;
use crate::value::Value;

/// How absent values are treated, independent of the type being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    /// Neither `null` nor `undefined` are permitted.
    #[serde(rename = "!")]
    Required,
    /// `null` is permitted, `undefined` is not.
    #[serde(rename = "+")]
    Expected,
    /// Both `null` and `undefined` are permitted.
    #[serde(rename = "?")]
    Optional,
    /// Every falsy value is permitted.
    #[serde(rename = "-")]
    Truthy,
}

impl Qualifier {
    /// The qualifier assumed when a typeset does not state one.
    pub const DEFAULT: Qualifier = Qualifier::Required;

    /// All qualifiers, in declaration order.
    pub fn all() -> &'static [Qualifier] {
        &[
            Qualifier::Required,
            Qualifier::Expected,
            Qualifier::Optional,
            Qualifier::Truthy,
        ]
    }

    /// The symbol used for this qualifier inside typesets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "!",
            Self::Expected => "+",
            Self::Optional => "?",
            Self::Truthy => "-",
        }
    }

    /// Whether `value` is an acceptable absent value under this qualifier.
    ///
    /// A `true` result means the caller must treat the value as valid and
    /// skip all type-specific checks.
    pub fn permits(&self, value: &Value) -> bool {
        match self {
            Self::Required => false,
            Self::Expected => value.is_null(),
            Self::Optional => value.is_null() || value.is_undefined(),
            Self::Truthy => !value.is_truthy(),
        }
    }
}

impl Default for Qualifier {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Qualifier {
    type Err = TypesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| TypesetError::UnknownQualifier(s.to_string()))
    }
}
