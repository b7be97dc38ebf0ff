//! `eventreg-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives and the storage contracts the
//! rest of the workspace programs against. No HTTP, no SQL.

pub mod error;
pub mod event;
pub mod id;
pub mod store;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use event::{Event, EventDetails};
pub use id::{EventId, UserId};
pub use store::{CredentialStore, EventStore, RegistrationLedger};
pub use user::{Credential, Email};
