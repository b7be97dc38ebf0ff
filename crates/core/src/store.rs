//! Storage contracts.
//!
//! These are the boundaries the request workflows program against. The
//! implementations live in `eventreg-infra`; the uniqueness guarantees stated
//! here must be enforced by the backing store itself, not by callers.

use async_trait::async_trait;

use crate::{Credential, DomainResult, Email, Event, EventDetails, EventId, UserId};

/// Persists user credentials with a uniqueness constraint on email.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a credential and return the assigned id.
    ///
    /// Fails with `DomainError::DuplicateEmail` when the email is taken, even
    /// if a concurrent request inserted it after the caller's existence check.
    async fn create(&self, email: &Email, password_hash: &str) -> DomainResult<UserId>;

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<Credential>>;

    async fn exists(&self, email: &Email) -> DomainResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

/// Event persistence. Ownership checks are the caller's job.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create(&self, owner: UserId, details: &EventDetails) -> DomainResult<Event>;

    /// All events, earliest `date_time` first.
    async fn list(&self) -> DomainResult<Vec<Event>>;

    async fn get(&self, id: EventId) -> DomainResult<Option<Event>>;

    /// Replace the details of an event; the owner is left untouched.
    ///
    /// Fails with `DomainError::NotFound` if the event vanished.
    async fn update(&self, id: EventId, details: &EventDetails) -> DomainResult<Event>;

    /// Delete an event together with its registrations.
    async fn delete(&self, id: EventId) -> DomainResult<()>;
}

/// (event, user) registration records, at most one per pair.
///
/// `is_registered` is advisory. Two concurrent `register` calls for the same
/// pair must produce exactly one success and one
/// `DomainError::DuplicateRegistration`, enforced at the storage level.
#[async_trait]
pub trait RegistrationLedger: Send + Sync {
    async fn is_registered(&self, event_id: EventId, user_id: UserId) -> DomainResult<bool>;

    async fn register(&self, event_id: EventId, user_id: UserId) -> DomainResult<()>;

    /// Fails with `DomainError::NotRegistered` when no record was removed.
    async fn unregister(&self, event_id: EventId, user_id: UserId) -> DomainResult<()>;
}
