//! Error types for request normalization and engine calls.

use thiserror::Error;

/// A request could not be normalized.
///
/// Validation is fail-fast: the first error found is the one reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Malformed textual encoding of a list, number or time value.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required parameter, or combination of time-range parameters, is absent.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Parallel arrays of unequal length.
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    /// Related parameters mix scalar and list forms, or a value has the wrong shape.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Well-formed but unusable value, such as a non-positive duration.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Any failure while answering a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failure raised by the external engine. The message is forwarded verbatim.
    #[error("{0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
