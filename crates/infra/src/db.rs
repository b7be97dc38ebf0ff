//! SQLite connection setup and schema.
//!
//! The schema carries the invariants the workflows rely on: `users.email` is
//! UNIQUE and `registrations` has UNIQUE(event_id, user_id). Foreign keys are
//! switched on per connection.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use eventreg_core::DomainError;

use crate::config::DatabaseConfig;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
"#;

const CREATE_EVENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        location TEXT NOT NULL,
        date_time TEXT NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id)
    )
"#;

const CREATE_REGISTRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS registrations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id),
        UNIQUE (event_id, user_id)
    )
"#;

/// Open (creating if needed) the database file and apply the schema.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!(path = %config.path.display(), "connecting to database");

    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Private in-memory database for tests.
///
/// Limited to one connection that never expires: every new SQLite memory
/// connection would otherwise see its own empty database.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Create all tables. Idempotent.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [CREATE_USERS_TABLE, CREATE_EVENTS_TABLE, CREATE_REGISTRATIONS_TABLE] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::debug!("schema created/verified");
    Ok(())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Log an unexpected database failure and hide its details from callers.
pub(crate) fn storage_error(operation: &'static str, err: sqlx::Error) -> DomainError {
    tracing::error!(operation, error = %err, "database operation failed");
    DomainError::storage(operation)
}
