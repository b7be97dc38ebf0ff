use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use eventreg_auth::{AuthError, TokenError};
use eventreg_core::DomainError;

/// Every failure a handler can produce, mapped to exactly one HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request body could not be bound (bad JSON, wrong content type).
    #[error("invalid request payload: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::NotConfigured => Self::Auth(AuthError::NotConfigured),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(AuthError::MissingCredential) => json_error(
                StatusCode::UNAUTHORIZED,
                "missing_credentials",
                "authorization header is required",
            ),
            ApiError::Auth(AuthError::InvalidCredential) => json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid or expired credentials",
            ),
            ApiError::Auth(AuthError::Forbidden) => json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "you do not have permission to modify this resource",
            ),
            ApiError::Auth(err @ (AuthError::NotConfigured | AuthError::HashingFailure(_))) => {
                internal(&err)
            }
            ApiError::Domain(DomainError::Validation(msg)) => {
                json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
            }
            ApiError::Domain(err @ DomainError::NotFound(_)) => {
                json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
            }
            ApiError::Domain(err @ DomainError::NotRegistered) => {
                json_error(StatusCode::NOT_FOUND, "not_registered", err.to_string())
            }
            ApiError::Domain(err @ DomainError::DuplicateEmail) => {
                json_error(StatusCode::CONFLICT, "duplicate_email", err.to_string())
            }
            ApiError::Domain(err @ DomainError::DuplicateRegistration) => {
                json_error(StatusCode::CONFLICT, "duplicate_registration", err.to_string())
            }
            ApiError::Domain(err @ DomainError::Storage(_)) => internal(&err),
            ApiError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_request", msg),
            err @ ApiError::Internal(_) => internal(&err),
        }
    }
}

/// Log the cause, answer with a generic 500.
fn internal(err: &dyn std::error::Error) -> Response {
    tracing::error!(error = %err, "request failed with internal error");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
