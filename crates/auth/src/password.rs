//! Password hashing and verification using Argon2
//!
//! Uses the argon2id variant with the crate's default (OWASP-recommended)
//! parameters. The output is a PHC string embedding algorithm, parameters and
//! salt, so verification needs nothing but the stored digest.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use std::sync::OnceLock;

use crate::AuthError;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingFailure(e.to_string()))
}

/// Check a password against a stored digest.
///
/// A digest that does not parse is treated as a non-match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Spend the same Argon2 work as `verify_password` against a throwaway digest.
///
/// Used when there is no stored digest to check (unknown account) so the
/// caller's response time does not reveal that. Always returns `false`.
pub fn verify_password_against_dummy(password: &str) -> bool {
    static DUMMY_DIGEST: OnceLock<Option<String>> = OnceLock::new();

    let digest = DUMMY_DIGEST.get_or_init(|| hash_password("eventreg-unknown-account").ok());
    if let Some(digest) = digest {
        let _ = verify_password(password, digest);
    }
    false
}
