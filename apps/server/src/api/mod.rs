use std::sync::Arc;

use axum::{response::Redirect, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiError, main_lib::AppState};

mod admin;
mod meta;
mod ticker;
mod tracks;
mod webhooks;

/// Prefix of the public API.
pub const API_PREFIX: &str = "/paragliding/api";
/// Prefix of the administrative API.
pub const ADMIN_PREFIX: &str = "/admin/api";

async fn redirect_to_api() -> Redirect {
    Redirect::to(API_PREFIX)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .merge(meta::router())
        .merge(tracks::router())
        .merge(ticker::router())
        .merge(webhooks::router());

    Router::new()
        .route("/paragliding", get(redirect_to_api))
        .nest(API_PREFIX, api)
        .nest(ADMIN_PREFIX, admin::router())
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
