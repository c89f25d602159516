//! Domain-level errors.
//!
//! These errors represent invalid input and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Identifier token is not a 24-character hex string
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    /// Password hashing or verification failed
    #[error("Password error: {0}")]
    Password(String),

    /// Hash cost outside the range accepted by the hash primitive
    #[error("Invalid hash cost: {0}")]
    InvalidCost(String),
}

impl DomainError {
    /// Create a malformed identifier error
    pub fn malformed_id(token: impl Into<String>) -> Self {
        DomainError::MalformedId(token.into())
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create an invalid cost error
    pub fn invalid_cost(msg: impl Into<String>) -> Self {
        DomainError::InvalidCost(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
