use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use eventreg_core::{
    DomainError, DomainResult, Event, EventDetails, EventId, EventStore, UserId,
};

use crate::db::storage_error;

const EVENT_COLUMNS: &str = "id, name, description, location, date_time, user_id";

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    name: String,
    description: String,
    location: String,
    date_time: DateTime<Utc>,
    user_id: i64,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_i64(row.id),
            details: EventDetails {
                name: row.name,
                description: row.description,
                location: row.location,
                date_time: row.date_time,
            },
            user_id: UserId::from_i64(row.user_id),
        }
    }
}

/// SQLite-backed event store (`events` table).
#[derive(Debug, Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn create(&self, owner: UserId, details: &EventDetails) -> DomainResult<Event> {
        let sql = format!(
            "INSERT INTO events (name, description, location, date_time, user_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING {EVENT_COLUMNS}"
        );

        sqlx::query_as::<_, EventRow>(&sql)
            .bind(&details.name)
            .bind(&details.description)
            .bind(&details.location)
            .bind(details.date_time)
            .bind(owner.as_i64())
            .fetch_one(&self.pool)
            .await
            .map(Event::from)
            .map_err(|e| storage_error("create event", e))
    }

    async fn list(&self) -> DomainResult<Vec<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date_time ASC, id ASC");

        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("list events", e))?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn get(&self, id: EventId) -> DomainResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?");

        sqlx::query_as::<_, EventRow>(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Event::from))
            .map_err(|e| storage_error("get event", e))
    }

    async fn update(&self, id: EventId, details: &EventDetails) -> DomainResult<Event> {
        // Owner column is deliberately absent from the SET list.
        let sql = format!(
            "UPDATE events SET name = ?, description = ?, location = ?, date_time = ? \
             WHERE id = ? RETURNING {EVENT_COLUMNS}"
        );

        sqlx::query_as::<_, EventRow>(&sql)
            .bind(&details.name)
            .bind(&details.description)
            .bind(&details.location)
            .bind(details.date_time)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("update event", e))?
            .map(Event::from)
            .ok_or(DomainError::not_found("event"))
    }

    async fn delete(&self, id: EventId) -> DomainResult<()> {
        let done = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete event", e))?;

        if done.rows_affected() == 0 {
            return Err(DomainError::not_found("event"));
        }
        Ok(())
    }
}
