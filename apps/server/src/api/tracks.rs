use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{NewTrackRequest, TrackResponse},
};

async fn ingest_track(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<String>> {
    let request: NewTrackRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("expected a track URL: {}", e)))?;
    let track = state.track_service.ingest(&request.into_url()).await?;
    Ok(Json(track.id()))
}

async fn list_tracks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.track_service.list_ids()?))
}

async fn get_track(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TrackResponse>> {
    let track = state.track_service.get_track(&id)?;
    Ok(Json(TrackResponse::from(track)))
}

async fn get_track_field(
    Path((id, field)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<String> {
    Ok(state.track_service.get_field(&id, &field)?)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/track", get(list_tracks).post(ingest_track))
        .route("/track/{id}", get(get_track))
        .route("/track/{id}/{field}", get(get_track_field))
}
