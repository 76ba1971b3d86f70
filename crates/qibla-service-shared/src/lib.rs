//! Shared infrastructure for the Qibla Finder HTTP service.
//!
//! This crate provides the HTTP glue around `qibla-lib`:
//!
//! - [`AppState`]: The prayer times provider shared by every handler
//! - [`ServiceConfig`]: Port and provider settings read from the environment
//! - [`health`]: Health check handlers for Kubernetes liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`CoordinateParams`]: Path coordinates with validation
//!
//! # Architecture
//!
//! Handlers stay thin. Geometry and provider access live in `qibla-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Extract {lat}/{lng} path segments                        │
//! │  - Validate coordinates                                     │
//! │  - Call qibla-lib APIs                                      │
//! │  - Map library errors to Problem Details                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds state around a scripted provider. Enable
//! the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ServiceConfig, DEFAULT_PORT};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_qibla_calculated, record_schedules_served,
    record_upstream_duration, record_upstream_failure, record_validation_failure, MetricsConfig,
    MetricsError,
};
pub use middleware::{
    extract_or_generate_request_id, normalize_path, MetricsLayer, RequestId, REQUEST_ID_HEADER,
};
pub use problem::{
    from_lib_error, ProblemDetails, INTERNAL_ERROR_DETAIL, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_COORDINATE, PROBLEM_MALFORMED_COORDINATE, PROBLEM_UPSTREAM_FAILURE,
    PROBLEM_UPSTREAM_TIMEOUT, PROBLEM_UPSTREAM_UNAVAILABLE,
};
pub use request::{CoordinateParams, Validate};
pub use state::{AppState, AppStateError};
