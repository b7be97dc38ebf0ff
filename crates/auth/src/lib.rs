//! `eventreg-auth`: identity and authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it mints and
//! verifies bearer tokens, hashes passwords and decides ownership. Callers
//! pass the current time in explicitly.

pub mod claims;
pub mod error;
pub mod guard;
pub mod identity;
pub mod ownership;
pub mod password;
pub mod token;

pub use claims::{TokenClaims, validate_claims};
pub use error::AuthError;
pub use guard::authenticate;
pub use identity::Identity;
pub use ownership::{Access, authorize, ensure_owner};
pub use password::{hash_password, verify_password, verify_password_against_dummy};
pub use token::{TokenConfig, TokenError, TokenService};
