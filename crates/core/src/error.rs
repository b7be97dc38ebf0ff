//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Covers validation, lookups and the uniqueness conflicts the store reports.
/// None of these carry secret material, so callers may surface them as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested resource was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The email is already bound to another credential.
    #[error("email already registered")]
    DuplicateEmail,

    /// The (event, user) pair already has a registration record.
    #[error("user is already registered for this event")]
    DuplicateRegistration,

    /// The (event, user) pair has no registration record.
    #[error("user is not registered for this event")]
    NotRegistered,

    /// The backing store failed for reasons unrelated to the request.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
