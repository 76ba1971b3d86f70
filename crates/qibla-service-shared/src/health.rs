//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for Kubernetes liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Configured prayer times provider (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            provider: None,
        }
    }

    /// Create a ready status naming the configured provider.
    ///
    /// The provider is not contacted; readiness only reflects local state.
    pub fn ready(service: &str, version: &str, provider: &str) -> Self {
        Self {
            provider: Some(provider.to_string()),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"qibla-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> (StatusCode, Json<HealthStatus>) {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"qibla-service-shared","version":"0.1.0","provider":"https://api.aladhan.com/v1"}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        state.provider_name(),
    );
    (StatusCode::OK, Json(status))
}
