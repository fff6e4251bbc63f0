use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use paragliding_core::ticker::Ticker;

use crate::{error::ApiResult, main_lib::AppState};

async fn latest_token(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    Ok(state.track_service.latest_token()?.to_string())
}

async fn latest_window(State(state): State<Arc<AppState>>) -> ApiResult<Json<Ticker>> {
    Ok(Json(state.ticker_service.latest_window()?))
}

async fn cursor_window(
    Path(token): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Ticker>> {
    Ok(Json(state.ticker_service.cursor_window(&token)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ticker", get(latest_window))
        .route("/ticker/latest", get(latest_token))
        .route("/ticker/{token}", get(cursor_window))
}
