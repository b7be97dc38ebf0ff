use thiserror::Error;

/// Outward authentication/authorization failures.
///
/// Every token verification failure collapses into `InvalidCredential`, and so
/// does a wrong password or unknown email at login. The precise cause is only
/// ever logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token service used before it was configured (startup ordering bug).
    #[error("token service is not configured")]
    NotConfigured,

    #[error("authorization header is required")]
    MissingCredential,

    #[error("invalid or expired credentials")]
    InvalidCredential,

    /// Identity is valid but does not own the resource.
    #[error("forbidden")]
    Forbidden,

    #[error("password hashing failed: {0}")]
    HashingFailure(String),
}
