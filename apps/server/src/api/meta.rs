use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use paragliding_core::constants::SERVICE_INFO;

use crate::{
    main_lib::AppState,
    models::{iso8601_duration, MetaResponse},
};

async fn get_meta(State(state): State<Arc<AppState>>) -> Json<MetaResponse> {
    Json(MetaResponse {
        uptime: iso8601_duration(state.started_at.elapsed().as_secs()),
        info: SERVICE_INFO.to_string(),
        version: format!("v{}", env!("CARGO_PKG_VERSION")),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_meta))
}
