//! Stateless bearer tokens (HS256 compact JWTs).
//!
//! A token is valid from issuance until its `exp` instant, inclusive. There is
//! no revocation list: the only way to invalidate a token is to let it expire
//! (or rotate the secret, which invalidates all of them).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{RawClaims, TokenClaims, validate_claims};
use crate::Identity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token service is not configured")]
    NotConfigured,

    /// Wrong number of segments or a segment that does not decode.
    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    SignatureMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token is missing required claim '{0}'")]
    MissingClaim(&'static str),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Secret and lifetime for token signing, fixed at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenConfig {
    secret: String,
    ttl: Duration,
}

impl TokenConfig {
    /// Build a configuration. An empty secret or a zero lifetime is refused
    /// with `NotConfigured` rather than silently producing forgeable tokens.
    pub fn new(secret: impl Into<String>, ttl_hours: u32) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.is_empty() || ttl_hours == 0 {
            return Err(TokenError::NotConfigured);
        }
        Ok(Self {
            secret,
            ttl: Duration::hours(i64::from(ttl_hours)),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl core::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies identity tokens.
///
/// Read-only after construction, so a single instance is shared across all
/// request tasks behind an `Arc`. `TokenService::default()` is unconfigured
/// and fails every call with `TokenError::NotConfigured`.
pub struct TokenService {
    keys: Option<SigningKeys>,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            keys: Some(SigningKeys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            ttl: config.ttl,
            validation: validation(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `identity`, valid from `now` for the configured TTL.
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::NotConfigured)?;
        let claims = TokenClaims::issue(identity, now, self.ttl);

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, required claims and expiry, in that order.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::NotConfigured)?;

        let data = jsonwebtoken::decode::<RawClaims>(token, &keys.decoding, &self.validation)
            .map_err(classify)?;
        let claims = data.claims.into_claims()?;
        validate_claims(&claims, now)?;

        Ok(claims.identity())
    }
}

impl Default for TokenService {
    fn default() -> Self {
        Self {
            keys: None,
            ttl: Duration::zero(),
            validation: validation(),
        }
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("configured", &self.is_configured())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Signature-only validation. Expiry is checked against the caller's `now`
/// in `validate_claims`, and claim presence in `RawClaims::into_claims`.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureMismatch,
        _ => TokenError::Malformed,
    }
}
