//! Error types for the filter engine.

use thiserror::Error;

/// Errors raised while lexing, parsing, typing, validating or compiling a
/// filter expression.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The source text does not match the grammar.
    #[error("invalid syntax at byte {offset}: {message}")]
    InvalidSyntax { message: String, offset: usize },

    /// A value could not be coerced to the type required by its key, or is
    /// used with an operator its type does not support.
    #[error("invalid value for key {key:?}: {message}")]
    InvalidValue { key: Option<String>, message: String },

    /// Two conditions on the same key contradict each other (differing
    /// equalities, two incompatible bounds, or a compound inequality whose
    /// two operators disagree on direction).
    #[error("duplicate or contradictory criteria for key {key:?}")]
    DuplicateCriterion { key: String },

    /// The query compiler was asked for a construct the target backend
    /// cannot express (for example a negated wildcard match against a JSON
    /// attribute on a dialect that does not support it reliably).
    #[error("construct not supported on backend {backend}: {message}")]
    UnsupportedOnBackend { backend: String, message: String },
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;
