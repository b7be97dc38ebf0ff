//! Request/response DTOs and JSON mapping helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventreg_auth::Identity;
use eventreg_core::{EventDetails, EventId, UserId};

/// Body of both `/auth/signup` and `/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: DateTime<Utc>,
}

impl From<EventRequest> for EventDetails {
    fn from(req: EventRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            location: req.location,
            date_time: req.date_time,
        }
    }
}

/// Public fields of an identity.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
}

impl From<&Identity> for UserResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.user_id,
            email: identity.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub event_id: EventId,
    pub user_id: UserId,
}
