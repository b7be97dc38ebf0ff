use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use eventreg_core::EventId;

use crate::app::dto::EventRequest;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::RequestIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", get(get_event).put(update_event).delete(delete_event))
}

/// Path ids are parsed by hand so a bad id gets our error body, not axum's.
pub(crate) fn parse_id(raw: &str) -> Result<EventId, ApiError> {
    Ok(raw.parse::<EventId>()?)
}

pub async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<impl IntoResponse, ApiError> {
    let items = services.list_events().await?;
    Ok(Json(json!({ "items": items })))
}

pub async fn get_event(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = services.get_event(parse_id(&id)?).await?;
    Ok(Json(event))
}

pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<RequestIdentity>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let event = services.create_event(caller.identity(), body.into()).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<RequestIdentity>,
    Path(id): Path<String>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let event = services
        .update_event(caller.identity(), id, body.into())
        .await?;

    Ok(Json(event))
}

pub async fn delete_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<RequestIdentity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    services.delete_event(caller.identity(), id).await?;

    Ok(Json(json!({ "id": id })))
}
