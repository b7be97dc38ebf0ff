//! Credential records and email handling.

use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, UserId};

/// A syntactically plausible email address.
///
/// Only the shape `local@domain` is checked; deliverability is not our concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(DomainError::validation("email must look like local@domain")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored login material for a user.
///
/// `password_hash` is a self-describing digest (algorithm, parameters and salt
/// are embedded), never the plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
