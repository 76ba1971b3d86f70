//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>
//!
//! [`from_lib_error`] is the one place where library error kinds become HTTP
//! status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use qibla_lib::Error as LibError;

/// Problem type URI for coordinates outside the valid range.
pub const PROBLEM_INVALID_COORDINATE: &str = "/problems/invalid-coordinate";

/// Problem type URI for coordinate path segments that are not numbers.
pub const PROBLEM_MALFORMED_COORDINATE: &str = "/problems/malformed-coordinate";

/// Problem type URI for provider requests that exceeded the timeout.
pub const PROBLEM_UPSTREAM_TIMEOUT: &str = "/problems/upstream-timeout";

/// Problem type URI for an unreachable prayer times provider.
pub const PROBLEM_UPSTREAM_UNAVAILABLE: &str = "/problems/upstream-unavailable";

/// Problem type URI for a provider that answered but declined the request.
pub const PROBLEM_UPSTREAM_FAILURE: &str = "/problems/upstream-failure";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Generic message returned for any fault the caller cannot act on.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use qibla_service_shared::{ProblemDetails, PROBLEM_INVALID_COORDINATE};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_INVALID_COORDINATE,
///     "Invalid Coordinate",
///     StatusCode::BAD_REQUEST,
/// )
/// .with_detail("invalid latitude: 91 (must be between -90 and 90)")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400: a latitude or longitude is out of range.
    pub fn invalid_coordinate(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_COORDINATE,
            "Invalid Coordinate",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 422: a coordinate path segment is not a decimal number.
    pub fn malformed_coordinate(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_MALFORMED_COORDINATE,
            "Malformed Coordinate",
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 504: the prayer times provider timed out.
    pub fn upstream_timeout(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_TIMEOUT,
            "Upstream Timeout",
            StatusCode::GATEWAY_TIMEOUT,
        )
        .with_detail("Prayer times service timeout")
        .with_request_id(request_id)
    }

    /// 503: the prayer times provider could not be reached.
    pub fn upstream_unavailable(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail("Prayer times service unavailable")
        .with_request_id(request_id)
    }

    /// 500: the prayer times provider declined the request.
    pub fn upstream_failure(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_FAILURE,
            "Upstream Failure",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail("Failed to fetch prayer times")
        .with_request_id(request_id)
    }

    /// 500: anything else. The detail is always the generic message.
    pub fn internal_error(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(INTERNAL_ERROR_DETAIL)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
/// Malformed provider payloads and client faults are reported as opaque internal
/// errors; callers are expected to log the original error.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidCoordinate { .. } => {
            ProblemDetails::invalid_coordinate(error.to_string(), request_id)
        }
        LibError::UpstreamTimeout { .. } => ProblemDetails::upstream_timeout(request_id),
        LibError::UpstreamUnavailable { .. } => ProblemDetails::upstream_unavailable(request_id),
        LibError::UpstreamLogicalFailure { .. } => ProblemDetails::upstream_failure(request_id),
        LibError::MalformedResponse { .. } | LibError::Http(_) => {
            ProblemDetails::internal_error(request_id)
        }
    }
}
