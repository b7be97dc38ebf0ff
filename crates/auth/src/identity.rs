use serde::{Deserialize, Serialize};

use eventreg_core::UserId;

/// Identity of an authenticated user.
///
/// Produced by a successful login or token verification; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "user {} <{}>", self.user_id, self.email)
    }
}
