//! Event entity and its mutable details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, EventId, UserId};

/// The caller-supplied part of an event (what create and update carry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: DateTime<Utc>,
}

impl EventDetails {
    /// Reject blank text fields. Surrounding whitespace is trimmed.
    pub fn validated(self) -> DomainResult<Self> {
        let name = required("name", self.name)?;
        let description = required("description", self.description)?;
        let location = required("location", self.location)?;

        Ok(Self {
            name,
            description,
            location,
            date_time: self.date_time,
        })
    }
}

fn required(field: &str, value: String) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// A stored event.
///
/// `user_id` is the owning identity, fixed at creation. Updates only ever
/// replace `details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub details: EventDetails,
    pub user_id: UserId,
}

impl Event {
    pub fn owner(&self) -> UserId {
        self.user_id
    }
}
