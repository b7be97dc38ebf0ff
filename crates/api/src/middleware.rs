use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use eventreg_auth::{authenticate, AuthError, TokenService};

use crate::app::errors::ApiError;
use crate::context::RequestIdentity;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

/// Reject the request unless it carries a valid bearer token; otherwise bind
/// the resolved identity to the request and continue.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidCredential)?),
    };

    let identity = authenticate(header, &state.tokens, Utc::now())?;
    tracing::debug!(user_id = %identity.user_id, "request authenticated");

    req.extensions_mut().insert(RequestIdentity::new(identity));
    Ok(next.run(req).await)
}
