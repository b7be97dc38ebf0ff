use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use eventreg_core::UserId;

use crate::{Identity, TokenError};

/// Claims carried by an identity token.
///
/// Timestamps are milliseconds since the Unix epoch, so two tokens issued for
/// the same identity a few milliseconds apart still differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the numeric user id.
    pub sub: UserId,

    pub email: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp. The token is still valid at exactly this instant.
    pub exp: i64,
}

impl TokenClaims {
    pub fn issue(identity: &Identity, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp_millis();
        Self {
            sub: identity.user_id,
            email: identity.email.clone(),
            iat,
            exp: iat + ttl.num_milliseconds(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, self.email.clone())
    }
}

/// Claims as they come off the wire, before any field is trusted.
///
/// Every field is optional so that a signed-but-incomplete payload is reported
/// as a missing claim rather than as a malformed token.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawClaims {
    sub: Option<Value>,
    email: Option<Value>,
    iat: Option<Value>,
    exp: Option<Value>,
}

impl RawClaims {
    pub(crate) fn into_claims(self) -> Result<TokenClaims, TokenError> {
        let sub = self
            .sub
            .as_ref()
            .and_then(Value::as_i64)
            .map(UserId::from_i64)
            .ok_or(TokenError::MissingClaim("sub"))?;
        let email = match self.email {
            Some(Value::String(email)) => email,
            _ => return Err(TokenError::MissingClaim("email")),
        };
        let iat = self
            .iat
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(TokenError::MissingClaim("iat"))?;
        let exp = self
            .exp
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(TokenError::MissingClaim("exp"))?;

        Ok(TokenClaims { sub, email, iat, exp })
    }
}

/// Check the validity window of already-verified claims.
///
/// Expiry is strict: `now == exp` is still valid, any instant after it is not.
/// An `exp` that cannot be represented as a point in time counts as absent.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    let expires_at =
        DateTime::from_timestamp_millis(claims.exp).ok_or(TokenError::MissingClaim("exp"))?;
    if now > expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}
