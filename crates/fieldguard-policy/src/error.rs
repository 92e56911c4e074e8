//! Validation error types.
//!
//! Every failure is surfaced to the caller immediately. A failed validation never
//! yields a verdict; callers should treat any of these errors as a denial.

use fieldguard_query::QueryError;
use std::fmt;

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a missing query error.
    pub fn null_input() -> Self {
        Self::new(
            ValidationErrorKind::NullInput,
            "Query text is required but was not provided",
        )
    }

    /// Create a malformed query error.
    pub fn malformed_query(reason: &str) -> Self {
        Self::new(
            ValidationErrorKind::MalformedQuery,
            format!("Query could not be decomposed: {}", reason),
        )
    }

    /// Create an unknown object error.
    pub fn unknown_object(object: &str) -> Self {
        Self::new(
            ValidationErrorKind::UnknownObject,
            format!("Object '{}' does not resolve to a known schema object", object),
        )
    }
}

impl From<QueryError> for ValidationError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Malformed { reason } => ValidationError::malformed_query(&reason),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No query text was supplied.
    NullInput,
    /// The query does not follow the clause grammar, or a mandatory clause is missing.
    MalformedQuery,
    /// The target object, after namespace rewriting, is not known to the schema.
    UnknownObject,
}
