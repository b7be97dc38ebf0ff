//! Bearer credential extraction and verification.
//!
//! Transport-agnostic: the caller hands over the raw `Authorization` header
//! value (if any). The HTTP layer owns binding the result to the request.

use chrono::{DateTime, Utc};

use crate::{AuthError, Identity, TokenError, TokenService};

const BEARER_SCHEME: &str = "bearer";

/// Resolve the identity behind an `Authorization` header value.
///
/// - no header, or nothing but whitespace: `MissingCredential`
/// - the `Bearer ` prefix is optional and matched case-insensitively
/// - every token verification failure becomes `InvalidCredential`, including
///   a scheme with no token after it
pub fn authenticate(
    authorization: Option<&str>,
    tokens: &TokenService,
    now: DateTime<Utc>,
) -> Result<Identity, AuthError> {
    let raw = authorization
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    let token = strip_scheme(raw);

    tokens.verify(token, now).map_err(|err| match err {
        TokenError::NotConfigured => {
            tracing::error!("token verification attempted before configuration");
            AuthError::NotConfigured
        }
        reason => {
            tracing::debug!(%reason, "bearer token rejected");
            AuthError::InvalidCredential
        }
    })
}

fn strip_scheme(raw: &str) -> &str {
    match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest.trim(),
        _ => raw,
    }
}
