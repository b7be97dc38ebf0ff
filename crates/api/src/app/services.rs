//! Request workflows on top of the stores and the auth primitives.
//!
//! Handlers stay thin: they bind input, call one method here and map the
//! result. Everything that needs an identity takes it as an explicit argument.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use eventreg_auth::{
    ensure_owner, hash_password, verify_password, verify_password_against_dummy, AuthError,
    Identity, TokenService,
};
use eventreg_core::{
    CredentialStore, DomainError, Email, Event, EventDetails, EventId, EventStore,
    RegistrationLedger,
};
use eventreg_infra::{SqliteCredentialStore, SqliteEventStore, SqliteRegistrationLedger};

use crate::app::errors::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Shared, read-only service handles.
pub struct AppServices {
    credentials: Arc<dyn CredentialStore>,
    events: Arc<dyn EventStore>,
    ledger: Arc<dyn RegistrationLedger>,
    tokens: Arc<TokenService>,
}

impl AppServices {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        events: Arc<dyn EventStore>,
        ledger: Arc<dyn RegistrationLedger>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            credentials,
            events,
            ledger,
            tokens,
        }
    }

    /// Wire every store to the same SQLite pool.
    pub fn sqlite(pool: SqlitePool, tokens: Arc<TokenService>) -> Self {
        Self::new(
            Arc::new(SqliteCredentialStore::new(pool.clone())),
            Arc::new(SqliteEventStore::new(pool.clone())),
            Arc::new(SqliteRegistrationLedger::new(pool)),
            tokens,
        )
    }

    pub fn tokens(&self) -> Arc<TokenService> {
        self.tokens.clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────

    pub async fn signup(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let email = Email::parse(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }

        // Friendly early answer; the UNIQUE index still decides under races.
        if self.credentials.exists(&email).await? {
            return Err(DomainError::DuplicateEmail.into());
        }

        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))??;

        let user_id = self.credentials.create(&email, &hash).await?;
        tracing::info!(%user_id, "user signed up");

        Ok(Identity::new(user_id, email.into_inner()))
    }

    /// Check credentials and mint a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, Identity), ApiError> {
        let email = Email::parse(email)?;

        let credential = self.credentials.find_by_email(&email).await?;

        // An unknown account still pays for a full Argon2 verification.
        let password = password.to_owned();
        let stored = credential.as_ref().map(|c| c.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || match stored {
            Some(stored) => verify_password(&password, &stored),
            None => verify_password_against_dummy(&password),
        })
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))?;

        let credential = match credential {
            Some(credential) if matches => credential,
            Some(credential) => {
                tracing::warn!(user_id = %credential.user_id, "login attempt with wrong password");
                return Err(AuthError::InvalidCredential.into());
            }
            None => {
                tracing::warn!("login attempt for unknown email");
                return Err(AuthError::InvalidCredential.into());
            }
        };

        let identity = Identity::new(credential.user_id, credential.email);
        let token = self.tokens.issue(&identity, Utc::now())?;
        tracing::info!(user_id = %identity.user_id, "user logged in");

        Ok((token, identity))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        Ok(self.events.list().await?)
    }

    pub async fn get_event(&self, id: EventId) -> Result<Event, ApiError> {
        self.events
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("event").into())
    }

    pub async fn create_event(
        &self,
        caller: &Identity,
        details: EventDetails,
    ) -> Result<Event, ApiError> {
        let details = details.validated()?;
        let event = self.events.create(caller.user_id, &details).await?;
        tracing::info!(event_id = %event.id, owner = %caller.user_id, "event created");
        Ok(event)
    }

    /// Load, check ownership, then replace details. Non-owners get `Forbidden`
    /// before the field checks run; a body that does not bind at all never
    /// gets here.
    pub async fn update_event(
        &self,
        caller: &Identity,
        id: EventId,
        details: EventDetails,
    ) -> Result<Event, ApiError> {
        let existing = self.get_event(id).await?;
        ensure_owner(existing.owner(), caller.user_id)?;

        let details = details.validated()?;
        Ok(self.events.update(id, &details).await?)
    }

    pub async fn delete_event(&self, caller: &Identity, id: EventId) -> Result<(), ApiError> {
        let existing = self.get_event(id).await?;
        ensure_owner(existing.owner(), caller.user_id)?;

        self.events.delete(id).await?;
        tracing::info!(event_id = %id, "event deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Registrations
    // ─────────────────────────────────────────────────────────────────────

    /// Event must exist; the pre-check only produces a clean message, the
    /// ledger's uniqueness constraint is what actually prevents duplicates.
    pub async fn register(&self, caller: &Identity, event_id: EventId) -> Result<(), ApiError> {
        self.get_event(event_id).await?;

        if self.ledger.is_registered(event_id, caller.user_id).await? {
            return Err(DomainError::DuplicateRegistration.into());
        }

        self.ledger.register(event_id, caller.user_id).await?;
        tracing::info!(%event_id, user_id = %caller.user_id, "registered for event");
        Ok(())
    }

    pub async fn unregister(&self, caller: &Identity, event_id: EventId) -> Result<(), ApiError> {
        if !self.ledger.is_registered(event_id, caller.user_id).await? {
            return Err(DomainError::NotRegistered.into());
        }

        self.ledger.unregister(event_id, caller.user_id).await?;
        tracing::info!(%event_id, user_id = %caller.user_id, "unregistered from event");
        Ok(())
    }
}
