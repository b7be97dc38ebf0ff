use axum::{routing::get, Router};

pub mod auth;
pub mod events;
pub mod registrations;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/events", events::router().merge(registrations::router()))
}
