//! Error types for litsql

use thiserror::Error;

/// Result type alias for query builder operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while building a query.
///
/// The `Display` output is exactly the message carried by the variant, so
/// callers can match on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// A required collaborator or prior call is missing
    /// (no `from()`, no table-name resolver).
    #[error("{0}")]
    Configuration(String),

    /// A clause was constructed with invalid input.
    #[error("{0}")]
    Validation(String),
}

impl QbError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration(m) | Self::Validation(m) => m,
        }
    }
}
