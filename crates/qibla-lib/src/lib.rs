//! Qibla Finder library entry points.
//!
//! This crate holds everything that is not HTTP glue: the Qibla geometry
//! (bearing and great-circle distance to the Kaaba), the prayer schedule
//! model, and the outbound prayer timings provider. Higher-level consumers
//! (the HTTP service) should only depend on the functions exported here.
//!

#![deny(warnings)]

pub mod error;
pub mod geodesy;
pub mod prayer;
pub mod provider;
pub mod schedule;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

pub use error::{CoordinateAxis, Error, Result};
pub use geodesy::{
    distance_to_kaaba, haversine_distance, initial_bearing, qibla_direction, Coordinate,
    QiblaResult, EARTH_RADIUS_KM, KAABA,
};
pub use prayer::{fetch_schedule, fetch_weekly, format_schedule, today, DAYS_PER_WEEK};
pub use provider::{
    AladhanClient, ProviderConfig, TimingsData, TimingsProvider, CALCULATION_METHOD_ISNA,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
pub use schedule::{format_time, PrayerSchedule, PrayerTimes};
