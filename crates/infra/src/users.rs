use async_trait::async_trait;
use sqlx::SqlitePool;

use eventreg_core::{Credential, CredentialStore, DomainError, DomainResult, Email, UserId};

use crate::db::{is_unique_violation, storage_error};

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    email: String,
    password: String,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Self {
            user_id: UserId::from_i64(row.id),
            email: row.email,
            password_hash: row.password,
        }
    }
}

/// SQLite-backed credential store (`users` table).
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create(&self, email: &Email, password_hash: &str) -> DomainResult<UserId> {
        let result = sqlx::query("INSERT INTO users (email, password) VALUES (?, ?)")
            .bind(email.as_str())
            .bind(password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(UserId::from_i64(done.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Err(DomainError::DuplicateEmail),
            Err(e) => Err(storage_error("create user", e)),
        }
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<Credential>> {
        sqlx::query_as::<_, CredentialRow>("SELECT id, email, password FROM users WHERE email = ?")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Credential::from))
            .map_err(|e| storage_error("find user by email", e))
    }

    async fn exists(&self, email: &Email) -> DomainResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("check user existence", e))?;
        Ok(count > 0)
    }
}
