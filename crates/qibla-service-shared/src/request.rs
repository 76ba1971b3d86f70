//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use qibla_lib::Coordinate;

use crate::{from_lib_error, ProblemDetails};

/// Validation trait for request types.
///
/// Implementations check the raw request and produce the validated domain
/// value, or a `ProblemDetails` error for invalid input.
pub trait Validate {
    /// Domain value produced by a successful validation.
    type Output;

    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<Self::Output, Box<ProblemDetails>>;
}

/// `{lat}/{lng}` path segments, kept as text so that number-format errors
/// and range errors are reported separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateParams {
    /// Latitude in decimal degrees.
    pub lat: String,

    /// Longitude in decimal degrees.
    pub lng: String,
}

impl CoordinateParams {
    pub fn new(lat: impl Into<String>, lng: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lng: lng.into(),
        }
    }
}

impl Validate for CoordinateParams {
    type Output = Coordinate;

    fn validate(&self, request_id: &str) -> Result<Coordinate, Box<ProblemDetails>> {
        let latitude = parse_degrees("latitude", &self.lat, request_id)?;
        let longitude = parse_degrees("longitude", &self.lng, request_id)?;

        Coordinate::new(latitude, longitude).map_err(|e| Box::new(from_lib_error(&e, request_id)))
    }
}

fn parse_degrees(name: &str, raw: &str, request_id: &str) -> Result<f64, Box<ProblemDetails>> {
    raw.trim().parse::<f64>().map_err(|_| {
        Box::new(ProblemDetails::malformed_coordinate(
            format!(
                "The '{}' path segment must be a decimal number of degrees, got '{}'",
                name, raw
            ),
            request_id,
        ))
    })
}
