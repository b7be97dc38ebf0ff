use eventreg_auth::Identity;
use eventreg_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted into request extensions by the auth middleware; one per request,
/// never shared between requests. Handlers take it via `Extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    identity: Identity,
}

impl RequestIdentity {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
