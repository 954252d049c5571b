//! HTTP API surface
//!
//! All routes live under `/api`. Authentication is a single middleware
//! over the whole tree; the public paths (login, register, health) are
//! skip-listed inside it rather than mounted on a separate router.

pub mod announcements;
pub mod auth;
pub mod health;
pub mod meetings;
pub mod members;
pub mod stats;

use std::time::Duration;

use axum::Router;
use axum::http::header::AUTHORIZATION;
use axum::middleware;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub fn create_router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health::health))
        .route("/stats", get(stats::get_stats))
        .route("/quota", get(members::handler::quota))
        .nest("/auth", auth::router())
        .nest("/members", members::router())
        .nest("/meetings", meetings::router())
        .nest("/announcements", announcements::router());

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-"),
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(Duration::from_millis(
            state.config.request_timeout_ms,
        )))
        .layer(cors.expose_headers([AUTHORIZATION]))
        .with_state(state)
}
