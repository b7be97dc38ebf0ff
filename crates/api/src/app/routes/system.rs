use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;

use crate::app::dto::UserResponse;
use crate::context::RequestIdentity;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn whoami(Extension(caller): Extension<RequestIdentity>) -> impl IntoResponse {
    Json(UserResponse::from(caller.identity()))
}
