//! Qibla Finder HTTP service.
//!
//! # Endpoints
//!
//! - `GET /api/` - API welcome message
//! - `GET /api/prayer-times/{lat}/{lng}` - Today's prayer schedule
//! - `GET /api/prayer-times/{lat}/{lng}/weekly` - Seven consecutive schedules
//! - `GET /api/qibla/{lat}/{lng}` - Qibla bearing and distance to the Kaaba
//! - `GET /metrics` - Prometheus metrics endpoint (path configurable)
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe

#![deny(warnings)]

pub mod handlers;

use std::any::Any;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::error;

use qibla_service_shared::{
    AppState, INTERNAL_ERROR_DETAIL, MetricsLayer, PROBLEM_INTERNAL_ERROR, ProblemDetails,
    health_live, health_ready, metrics_handler,
};

/// Body of `GET /api/`.
pub const API_WELCOME_MESSAGE: &str = "Qibla Finder API - Prayer Times & Direction";

#[derive(Debug, Serialize)]
struct ApiInfo {
    message: &'static str,
}

/// Build the service router with every route and middleware layer attached.
///
/// Layers run outermost first: `MetricsLayer` assigns the request ID and
/// times the request, CORS answers preflights, and panics inside handlers
/// become an opaque 500 problem.
pub fn build_router(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route("/api/", get(root_handler))
        .route("/api/prayer-times/{lat}/{lng}", get(handlers::prayer_times))
        .route(
            "/api/prayer-times/{lat}/{lng}/weekly",
            get(handlers::weekly_prayer_times),
        )
        .route("/api/qibla/{lat}/{lng}", get(handlers::qibla))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::very_permissive())
        .layer(MetricsLayer)
        .with_state(state)
}

async fn root_handler() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: API_WELCOME_MESSAGE,
    })
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    error!(panic = message, "handler panicked");

    ProblemDetails::new(
        PROBLEM_INTERNAL_ERROR,
        "Internal Error",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .with_detail(INTERNAL_ERROR_DETAIL)
    .into_response()
}
