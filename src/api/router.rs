use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::charts;
use super::evaluations;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware, MAX_BODY_SIZE};
use super::reset;
use super::state::AppState;
use super::users;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let request_id = axum::http::HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(users::create_users_router())
        .merge(charts::create_charts_router())
        .merge(evaluations::create_evaluations_router())
        .merge(reset::create_reset_router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
