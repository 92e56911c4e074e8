//! Error types for the query crate.

use thiserror::Error;

/// Errors that can occur while decomposing query text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The text does not follow the clause grammar, or a mandatory clause is missing.
    #[error("malformed query: {reason}")]
    Malformed { reason: String },
}

impl QueryError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        QueryError::Malformed {
            reason: reason.into(),
        }
    }
}
