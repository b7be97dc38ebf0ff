use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::dto::RegistrationResponse;
use crate::app::errors::ApiError;
use crate::app::routes::events::parse_id;
use crate::app::services::AppServices;
use crate::context::RequestIdentity;

/// Registration is always for the caller; there is no way to register
/// someone else.
pub fn router() -> Router {
    Router::new().route("/:id/registrations", post(register).delete(unregister))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<RequestIdentity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = parse_id(&id)?;
    services.register(caller.identity(), event_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            event_id,
            user_id: caller.user_id(),
        }),
    ))
}

pub async fn unregister(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<RequestIdentity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = parse_id(&id)?;
    services.unregister(caller.identity(), event_id).await?;

    Ok(Json(RegistrationResponse {
        event_id,
        user_id: caller.user_id(),
    }))
}
