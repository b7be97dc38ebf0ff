//! Registration ledger backed by the `registrations` table.
//!
//! Duplicate prevention is the UNIQUE(event_id, user_id) index. `register`
//! never checks first; it inserts and translates the constraint violation.

use async_trait::async_trait;
use sqlx::SqlitePool;

use eventreg_core::{DomainError, DomainResult, EventId, RegistrationLedger, UserId};

use crate::db::{is_foreign_key_violation, is_unique_violation, storage_error};

#[derive(Debug, Clone)]
pub struct SqliteRegistrationLedger {
    pool: SqlitePool,
}

impl SqliteRegistrationLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationLedger for SqliteRegistrationLedger {
    async fn is_registered(&self, event_id: EventId, user_id: UserId) -> DomainResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE event_id = ? AND user_id = ?",
        )
        .bind(event_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("check registration", e))?;

        Ok(count > 0)
    }

    async fn register(&self, event_id: EventId, user_id: UserId) -> DomainResult<()> {
        let result = sqlx::query("INSERT INTO registrations (event_id, user_id) VALUES (?, ?)")
            .bind(event_id.as_i64())
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(DomainError::DuplicateRegistration),
            // The event was deleted between the existence check and the insert.
            Err(e) if is_foreign_key_violation(&e) => Err(DomainError::not_found("event")),
            Err(e) => Err(storage_error("register", e)),
        }
    }

    async fn unregister(&self, event_id: EventId, user_id: UserId) -> DomainResult<()> {
        let done = sqlx::query("DELETE FROM registrations WHERE event_id = ? AND user_id = ?")
            .bind(event_id.as_i64())
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("unregister", e))?;

        if done.rows_affected() == 0 {
            return Err(DomainError::NotRegistered);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::{SqliteCredentialStore, SqliteEventStore};
    use chrono::Utc;
    use eventreg_core::{CredentialStore, Email, EventDetails, EventStore};

    async fn setup() -> (SqliteRegistrationLedger, SqliteEventStore, EventId, UserId) {
        let pool = connect_in_memory().await.unwrap();
        let user = SqliteCredentialStore::new(pool.clone())
            .create(&Email::parse("u@x.com").unwrap(), "h")
            .await
            .unwrap();
        let events = SqliteEventStore::new(pool.clone());
        let event = events
            .create(
                user,
                &EventDetails {
                    name: "Meetup".into(),
                    description: "desc".into(),
                    location: "Oslo".into(),
                    date_time: Utc::now(),
                },
            )
            .await
            .unwrap();
        (SqliteRegistrationLedger::new(pool), events, event.id, user)
    }

    #[tokio::test]
    async fn register_twice_then_unregister() {
        let (ledger, _, event, user) = setup().await;

        assert!(!ledger.is_registered(event, user).await.unwrap());
        ledger.register(event, user).await.unwrap();
        assert!(ledger.is_registered(event, user).await.unwrap());

        assert_eq!(
            ledger.register(event, user).await.unwrap_err(),
            DomainError::DuplicateRegistration
        );

        ledger.unregister(event, user).await.unwrap();
        assert!(!ledger.is_registered(event, user).await.unwrap());
    }

    #[tokio::test]
    async fn unregister_without_record_is_not_registered() {
        let (ledger, _, event, user) = setup().await;

        assert_eq!(
            ledger.unregister(event, user).await.unwrap_err(),
            DomainError::NotRegistered
        );
    }

    #[tokio::test]
    async fn concurrent_registers_yield_one_winner() {
        let (ledger, _, event, user) = setup().await;

        let (a, b) = tokio::join!(ledger.register(event, user), ledger.register(event, user));
        let outcomes = [a, b];

        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.contains(&Err(DomainError::DuplicateRegistration)));
    }

    #[tokio::test]
    async fn register_for_missing_event_is_not_found() {
        let (ledger, _, _, user) = setup().await;

        assert_eq!(
            ledger.register(EventId::from_i64(404), user).await.unwrap_err(),
            DomainError::not_found("event")
        );
    }

    #[tokio::test]
    async fn deleting_event_cascades_registrations() {
        let (ledger, events, event, user) = setup().await;
        ledger.register(event, user).await.unwrap();

        events.delete(event).await.unwrap();

        assert!(!ledger.is_registered(event, user).await.unwrap());
    }
}
