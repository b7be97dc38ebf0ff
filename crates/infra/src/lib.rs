//! Infrastructure layer: configuration, SQLite connection and the store
//! implementations behind the `eventreg-core` contracts.

pub mod config;
pub mod db;
pub mod events;
pub mod registrations;
pub mod users;


pub use config::{AppConfig, ConfigError};
pub use events::SqliteEventStore;
pub use registrations::SqliteRegistrationLedger;
pub use users::SqliteCredentialStore;
