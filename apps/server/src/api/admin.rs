use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get},
    Router,
};

use crate::{error::ApiResult, main_lib::AppState};

pub async fn healthz() -> &'static str {
    "ok"
}

async fn tracks_count(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    Ok(state.track_service.count()?.to_string())
}

async fn wipe_tracks(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    let previous = state.track_service.wipe().await?;
    tracing::warn!("Admin wiped {} track(s)", previous);
    Ok(previous.to_string())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/tracks_count", get(tracks_count))
        .route("/tracks", delete(wipe_tracks))
}
