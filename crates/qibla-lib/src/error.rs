use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Convenient result alias for the Qibla Finder library.
pub type Result<T> = std::result::Result<T, Error>;

/// The half of a coordinate that failed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    Latitude,
    Longitude,
}

impl CoordinateAxis {
    /// Inclusive `(min, max)` bounds in decimal degrees.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            CoordinateAxis::Latitude => (-90.0, 90.0),
            CoordinateAxis::Longitude => (-180.0, 180.0),
        }
    }
}

impl fmt::Display for CoordinateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateAxis::Latitude => write!(f, "latitude"),
            CoordinateAxis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A latitude or longitude fell outside its valid range.
    #[error("invalid {axis}: {value} (must be between {min} and {max})")]
    InvalidCoordinate {
        axis: CoordinateAxis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The prayer times provider did not answer within the configured timeout.
    #[error("prayer times provider did not respond within {timeout:?}")]
    UpstreamTimeout { timeout: Duration },

    /// The prayer times provider could not be reached.
    #[error("prayer times provider unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// The provider answered but reported a non-success code.
    #[error("prayer times provider declined the request (code {code}): {status}")]
    UpstreamLogicalFailure { code: i64, status: String },

    /// The provider reported success but its payload could not be used.
    #[error("malformed prayer times response: {message}")]
    MalformedResponse { message: String },

    /// Wrapper for HTTP client construction errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether a caller may reasonably retry the same request later.
    ///
    /// The library itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::UpstreamTimeout { .. } | Error::UpstreamUnavailable { .. }
        )
    }

    /// Short machine-friendly label, used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidCoordinate { .. } => "invalid_coordinate",
            Error::UpstreamTimeout { .. } => "upstream_timeout",
            Error::UpstreamUnavailable { .. } => "upstream_unavailable",
            Error::UpstreamLogicalFailure { .. } => "upstream_declined",
            Error::MalformedResponse { .. } => "malformed_response",
            Error::Http(_) => "http_client",
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: message.into(),
        }
    }
}
