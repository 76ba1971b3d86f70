//! Prayer schedule model returned to API consumers.

use chrono::NaiveTime;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geodesy::Coordinate;

/// Format used for every time-of-day value in a [`PrayerSchedule`].
pub const TIME_FORMAT: &str = "%H:%M";

/// The six daily time points, each as a 24-hour `HH:MM` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrayerTimes {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl PrayerTimes {
    /// Iterate `(name, time)` pairs in chronological order of the day.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("fajr", self.fajr.as_str()),
            ("sunrise", self.sunrise.as_str()),
            ("dhuhr", self.dhuhr.as_str()),
            ("asr", self.asr.as_str()),
            ("maghrib", self.maghrib.as_str()),
            ("isha", self.isha.as_str()),
        ]
        .into_iter()
    }
}

/// Prayer times for one date and location.
///
/// Built fresh for each request from provider data and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerSchedule {
    /// Gregorian date exactly as reported by the provider (e.g. `17-10-2026`).
    pub date: String,
    pub location: Coordinate,
    pub times: PrayerTimes,
    /// Name of the calculation method the provider applied.
    pub method: String,
    /// IANA timezone the provider resolved for the location.
    pub timezone: String,
}

/// Reduce a provider time value such as `"05:12 (EET)"` to `"05:12"`.
///
/// Only the first whitespace-separated token is kept and it must be a valid
/// 24-hour `HH:MM` time.
pub fn format_time(raw: &str) -> Result<String> {
    let token = raw.split_whitespace().next().unwrap_or_default();
    NaiveTime::parse_from_str(token, TIME_FORMAT)
        .map(|time| time.format(TIME_FORMAT).to_string())
        .map_err(|_| Error::malformed(format!("unrecognised time value '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_strips_timezone_annotation() {
        assert_eq!(format_time("05:12 (EET)").unwrap(), "05:12");
        assert_eq!(format_time("17:45 (+03)").unwrap(), "17:45");
    }

    #[test]
    fn format_time_accepts_plain_values() {
        assert_eq!(format_time("23:59").unwrap(), "23:59");
        assert_eq!(format_time("00:00").unwrap(), "00:00");
    }

    #[test]
    fn format_time_ignores_surrounding_whitespace() {
        assert_eq!(format_time("  06:30   (BST)").unwrap(), "06:30");
    }

    #[test]
    fn format_time_rejects_garbage() {
        assert!(format_time("").is_err());
        assert!(format_time("soon").is_err());
        assert!(format_time("25:00").is_err());
        assert!(format_time("12:60").is_err());
    }

    #[test]
    fn prayer_times_iterates_in_day_order() {
        let times = PrayerTimes {
            fajr: "05:00".into(),
            sunrise: "06:30".into(),
            dhuhr: "12:15".into(),
            asr: "15:40".into(),
            maghrib: "18:05".into(),
            isha: "19:30".into(),
        };
        let names: Vec<_> = times.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["fajr", "sunrise", "dhuhr", "asr", "maghrib", "isha"]
        );
    }
}
