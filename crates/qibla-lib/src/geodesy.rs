//! Great-circle geometry relative to the Kaaba.
//!
//! Everything here is a pure function over validated [`Coordinate`]s: no
//! state, no I/O and no failure modes once a coordinate exists.

use serde::Serialize;

use crate::error::{CoordinateAxis, Error, Result};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Location of the Kaaba in Mecca, the reference point for every Qibla query.
pub const KAABA: Coordinate = Coordinate {
    latitude: 21.4225,
    longitude: 39.8262,
};

/// A validated point on the globe in decimal degrees.
///
/// Construct through [`Coordinate::new`]; the fields are private so a
/// `Coordinate` is always within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate and build a coordinate.
    ///
    /// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`.
    /// Non-finite values are rejected as out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_axis(CoordinateAxis::Latitude, latitude)?;
        check_axis(CoordinateAxis::Longitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// `(latitude, longitude)` in radians.
    pub fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

fn check_axis(axis: CoordinateAxis, value: f64) -> Result<()> {
    let (min, max) = axis.bounds();
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidCoordinate {
            axis,
            value,
            min,
            max,
        })
    }
}

/// Initial great-circle bearing from `from` to `to`, clockwise from true
/// north, in `[0, 360)`.
///
/// When both points coincide the heading is undefined; `atan2(0, 0)` yields
/// `0.0`, so the result stays finite.
pub fn initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    let (phi_from, lambda_from) = from.to_radians();
    let (phi_to, lambda_to) = to.to_radians();
    let delta_lambda = lambda_to - lambda_from;

    let y = delta_lambda.sin() * phi_to.cos();
    let x = phi_from.cos() * phi_to.sin() - phi_from.sin() * phi_to.cos() * delta_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Great-circle distance between two points in kilometers (haversine).
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Qibla direction from `location`: the bearing towards [`KAABA`].
pub fn qibla_direction(location: &Coordinate) -> f64 {
    initial_bearing(location, &KAABA)
}

/// Great-circle distance from `location` to [`KAABA`] in kilometers.
pub fn distance_to_kaaba(location: &Coordinate) -> f64 {
    haversine_distance(location, &KAABA)
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = (degrees + 360.0) % 360.0;
    // -0.0 and values that round to 360.0 both collapse onto 0.0
    if normalized >= 360.0 || normalized == 0.0 {
        0.0
    } else {
        normalized
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Qibla direction and distance for a location, as served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QiblaResult {
    /// Bearing in degrees, rounded to one decimal, in `[0, 360)`.
    pub qibla_direction: f64,
    /// Distance to the Kaaba in kilometers, rounded to one decimal.
    pub distance_km: f64,
    /// The location the values were computed for.
    pub location: Coordinate,
}

impl QiblaResult {
    pub fn for_location(location: Coordinate) -> Self {
        Self {
            qibla_direction: normalize_degrees(round_to_tenth(qibla_direction(&location))),
            distance_km: round_to_tenth(distance_to_kaaba(&location)),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn coordinate_accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn coordinate_rejects_out_of_range_latitude() {
        match Coordinate::new(90.5, 0.0) {
            Err(Error::InvalidCoordinate { axis, value, .. }) => {
                assert_eq!(axis, CoordinateAxis::Latitude);
                assert_eq!(value, 90.5);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn coordinate_rejects_out_of_range_longitude() {
        match Coordinate::new(0.0, -180.1) {
            Err(Error::InvalidCoordinate { axis, .. }) => {
                assert_eq!(axis, CoordinateAxis::Longitude)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn latitude_is_checked_before_longitude() {
        match Coordinate::new(100.0, 200.0) {
            Err(Error::InvalidCoordinate { axis, .. }) => {
                assert_eq!(axis, CoordinateAxis::Latitude)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn coordinate_rejects_non_finite_values() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn normalize_degrees_wraps_negative_and_full_turns() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(-0.0), 0.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }

    #[test]
    fn bearing_due_north_and_east() {
        let origin = coord(0.0, 0.0);
        assert!(initial_bearing(&origin, &coord(10.0, 0.0)).abs() < 1e-9);
        assert!((initial_bearing(&origin, &coord(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing(&origin, &coord(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing(&origin, &coord(0.0, -10.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn qibla_result_rounds_to_one_decimal() {
        let result = QiblaResult::for_location(coord(40.7128, -74.0060));
        assert_eq!(result.qibla_direction, round_to_tenth(result.qibla_direction));
        assert_eq!(result.distance_km, round_to_tenth(result.distance_km));
        assert_eq!(result.location, coord(40.7128, -74.0060));
    }

    #[test]
    fn qibla_result_serializes_location_object() {
        let result = QiblaResult::for_location(coord(51.5074, -0.1278));
        let json = serde_json::to_value(result).unwrap();
        assert!(json["qibla_direction"].is_number());
        assert!(json["distance_km"].is_number());
        assert_eq!(json["location"]["latitude"], 51.5074);
        assert_eq!(json["location"]["longitude"], -0.1278);
    }
}
