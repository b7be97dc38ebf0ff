use eventreg_core::UserId;

use crate::AuthError;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Decide whether `caller` may mutate a resource owned by `owner`.
///
/// - No IO
/// - No panics
/// - Pure equality: only the recorded owner may mutate
pub fn authorize(owner: UserId, caller: UserId) -> Access {
    if owner == caller {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// `authorize`, lifted into the error taxonomy.
///
/// A denial is `Forbidden`: the caller is authenticated, just not the owner.
pub fn ensure_owner(owner: UserId, caller: UserId) -> Result<(), AuthError> {
    match authorize(owner, caller) {
        Access::Allow => Ok(()),
        Access::Deny => {
            tracing::debug!(%owner, %caller, "ownership check denied");
            Err(AuthError::Forbidden)
        }
    }
}
