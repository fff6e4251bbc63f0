use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use paragliding_core::webhooks::{NewWebhook, Webhook};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn register_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<String> {
    let new_webhook: NewWebhook = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid webhook registration: {}", e)))?;
    let webhook = state.webhook_service.register(new_webhook).await?;
    Ok(webhook.id)
}

async fn get_webhook(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Webhook>> {
    Ok(Json(state.webhook_service.get(&id)?))
}

async fn delete_webhook(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Webhook>> {
    Ok(Json(state.webhook_service.delete(&id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook/new_track", post(register_webhook))
        .route(
            "/webhook/new_track/{id}",
            get(get_webhook).delete(delete_webhook),
        )
}
