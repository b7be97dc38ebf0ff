//! Public account endpoints: signup and login.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::dto::{CredentialsRequest, LoginResponse, UserResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let identity = services.signup(&body.email, &body.password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&identity))))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let (token, identity) = services.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&identity),
    }))
}
