//! # Error Types — Programmer Errors
//!
//! Two failure classes exist in runtime type verification and they never mix:
//!
//! - A value that does not comply with its typeset is a *data* failure. It is
//!   reported as [`crate::result::Verdict::Error`] and never as an `Err`.
//! - A malformed typeset, an unknown type or qualifier name, an invalid
//!   context, or a type with no registered validator is a *programmer* error.
//!   It is reported as [`TypesetError`] and must propagate to the caller.
//!
//! ## Design
//!
//! - Grammar violations carry the offending index and what was expected
//!   there, so a mistake deep inside a nested typeset can be located.
//! - Every error message is stable text suitable for assertions in tests.

use thiserror::Error;

use crate::types::TypeName;

/// A programmer error: the typeset, context or registry is unusable.
#[derive(Error, Debug)]
pub enum TypesetError {
    /// The typeset violates the typeset grammar.
    #[error("invalid typeset={typeset}: {reason}")]
    Invalid {
        /// The offending typeset, printed.
        typeset: String,
        /// The grammar rule that was violated.
        reason: GrammarError,
    },

    /// A string in a typeset names no known type.
    #[error("unknown type name \"{0}\"")]
    UnknownType(String),

    /// A qualifier symbol is not one of `!`, `+`, `?`, `-`.
    #[error("unknown qualifier \"{0}\"")]
    UnknownQualifier(String),

    /// Arguments were supplied for a type that accepts none.
    #[error("type=\"{0}\" does not accept args")]
    ArgsNotAccepted(TypeName),

    /// The engine has no validator registered for a type.
    #[error("missing validator for type=\"{0}\"")]
    MissingValidator(TypeName),

    /// The validation context is internally inconsistent.
    #[error("invalid type validator context: {0}")]
    InvalidContext(String),

    /// An operation that walks list alternatives was given another form.
    #[error("typeset={0} must be a list")]
    ListRequired(String),

    /// A typeset handed to `check_with_type` describes more than one type.
    #[error("specified singleType={0} typeset must represent a single type")]
    NotSingleType(String),

    /// A pattern argument (`exp`, `keyExp`) is not a valid regular expression.
    #[error("invalid regular expression /{pattern}/: {source}")]
    InvalidPattern {
        /// The pattern as written in the typeset.
        pattern: String,
        /// Compilation error from the regex engine.
        #[source]
        source: regex::Error,
    },

    /// Pattern flags other than `i`, `m`, `s`, `u`, `g` and `y`.
    #[error("invalid regular expression flags \"{0}\"")]
    InvalidPatternFlags(String),

    /// A typeset document could not be parsed.
    #[error("typeset document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the grammar expected at a position where something else was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expecting {
    /// A shape descriptor (leading position of a list).
    Shape,
    /// A type arguments object (any other position).
    TypeArgs,
}

impl std::fmt::Display for Expecting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape => f.write_str("Expecting object (shape)"),
            Self::TypeArgs => f.write_str("Expecting object (type args)"),
        }
    }
}

/// A violated typeset grammar rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// List typesets must contain at least one element.
    #[error("list typeset must not be empty")]
    EmptyList,

    /// A value that cannot be part of a typeset.
    #[error("Unexpected value at index={index}: {expecting}")]
    Unexpected {
        /// Position within the list.
        index: usize,
        /// What would have been valid there.
        expecting: Expecting,
    },

    /// Something that is not a typeset at all (a number, a boolean, null).
    #[error("Expecting a typeset, found {0}")]
    NotATypeset(String),

    /// A string that names neither a qualifier nor a type.
    #[error("unknown type name \"{0}\"")]
    UnknownType(String),

    /// A qualifier appears somewhere other than the first element.
    #[error("qualifier at index={index} must be the first element")]
    MisplacedQualifier {
        /// Position within the list.
        index: usize,
    },

    /// A lone qualifier is not a typeset.
    #[error("a qualifier alone is not a typeset")]
    QualifierOnly,

    /// The list names no type (and no validator implies one).
    #[error("typeset must contain at least one type")]
    MissingType,

    /// An arguments object does not directly follow a type.
    #[error("type args at index={index} must directly follow a type")]
    ArgsWithoutType {
        /// Position within the list.
        index: usize,
    },

    /// An arguments object follows a type that takes none.
    #[error("type=\"{type_name}\" before index={index} does not accept args")]
    ArgsNotAccepted {
        /// Position of the arguments object.
        index: usize,
        /// The preceding type.
        type_name: TypeName,
    },

    /// A shape outside the leading position of a list.
    #[error("shape at index={index} must be at index 0 or directly after the qualifier")]
    MisplacedShape {
        /// Position within the list.
        index: usize,
    },

    /// A custom validator is followed by further elements.
    #[error("custom validator at index={index} must be the last element")]
    MisplacedValidator {
        /// Position of the validator.
        index: usize,
    },

    /// More than one custom validator in a single list.
    #[error("only one custom validator is allowed; found another at index={index}")]
    MultipleValidators {
        /// Position of the second validator.
        index: usize,
    },

    /// A fully-qualified typeset must be a list starting with a qualifier.
    #[error("fully-qualified typeset must be a list starting with a qualifier")]
    QualifierRequired,

    /// Shorthand forms are not allowed in fully-qualified typesets.
    #[error("Unexpected value at index={index}: shorthand {form} is not allowed in a fully-qualified typeset")]
    ShorthandNotAllowed {
        /// Position within the list.
        index: usize,
        /// `"shape"`, `"array"` or `"validator"`.
        form: &'static str,
    },

    /// Object-type args carry a `$` that is not a shape.
    #[error("Expecting a valid shape descriptor for type=\"{0}\"")]
    InvalidShapeArg(TypeName),

    /// Collection args carry a `$`, `$keys` or `$values` that is not a typeset.
    #[error("Expecting a valid typeset in args.{key} for type=\"{type_name}\"")]
    InvalidTypesetArg {
        /// The argument name.
        key: String,
        /// The type owning the arguments.
        type_name: TypeName,
    },

    /// A violation inside a nested typeset (deep validation).
    #[error("{location}: {source}")]
    Nested {
        /// Where the nested typeset lives, e.g. `index=1` or `prop="foo"`.
        location: String,
        /// The violation found there.
        source: Box<GrammarError>,
    },
}

impl GrammarError {
    /// Wraps `self` as a violation found at `location` within a parent typeset.
    pub fn nested(self, location: impl Into<String>) -> Self {
        GrammarError::Nested {
            location: location.into(),
            source: Box::new(self),
        }
    }

    /// The innermost violation, unwrapping any [`GrammarError::Nested`] layers.
    pub fn innermost(&self) -> &GrammarError {
        match self {
            GrammarError::Nested { source, .. } => source.innermost(),
            other => other,
        }
    }
}
