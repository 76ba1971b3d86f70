// Test-only helpers: canned provider payloads and a scripted provider.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use crate::error::{Error, Result};
use crate::geodesy::Coordinate;
use crate::provider::{TimingsData, TimingsProvider};

/// Date format the provider uses for `date.gregorian.date`.
pub const PROVIDER_DATE_FORMAT: &str = "%d-%m-%Y";

/// A realistic AlAdhan `data` document for `date`, with annotated times.
pub fn sample_timings(date: NaiveDate) -> TimingsData {
    serde_json::from_value(sample_timings_json(date)).expect("sample timings deserialize")
}

/// The same document as [`sample_timings`], as raw JSON.
pub fn sample_timings_json(date: NaiveDate) -> serde_json::Value {
    json!({
        "timings": {
            "Fajr": "05:12 (EST)",
            "Sunrise": "06:41 (EST)",
            "Dhuhr": "11:58 (EST)",
            "Asr": "14:27 (EST)",
            "Sunset": "16:36 (EST)",
            "Maghrib": "16:36 (EST)",
            "Isha": "18:04 (EST)",
            "Imsak": "05:02 (EST)",
            "Midnight": "23:59 (EST)"
        },
        "date": {
            "readable": date.format("%d %b %Y").to_string(),
            "timestamp": crate::provider::midnight_timestamp(date).to_string(),
            "gregorian": { "date": date.format(PROVIDER_DATE_FORMAT).to_string() }
        },
        "meta": {
            "latitude": 40.7128,
            "longitude": -74.006,
            "timezone": "America/New_York",
            "method": { "id": 2, "name": "Islamic Society of North America (ISNA)" }
        }
    })
}

/// Failure a [`FakeProvider`] can be scripted to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Timeout,
    Unavailable,
    Declined,
    Malformed,
}

impl FailureMode {
    fn to_error(self) -> Error {
        match self {
            FailureMode::Timeout => Error::UpstreamTimeout {
                timeout: Duration::from_secs(10),
            },
            FailureMode::Unavailable => Error::UpstreamUnavailable {
                message: "connection refused".to_string(),
            },
            FailureMode::Declined => Error::UpstreamLogicalFailure {
                code: 400,
                status: "BAD_REQUEST".to_string(),
            },
            FailureMode::Malformed => Error::malformed("scripted malformed payload"),
        }
    }
}

/// In-memory [`TimingsProvider`] that records every requested date.
#[derive(Debug, Default)]
pub struct FakeProvider {
    failure: Option<FailureMode>,
    fail_on: Option<NaiveDate>,
    calls: AtomicUsize,
    dates: Mutex<Vec<NaiveDate>>,
}

impl FakeProvider {
    /// Always answers with [`sample_timings`] for the requested date.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Fails every request with `mode`.
    pub fn failing(mode: FailureMode) -> Self {
        Self {
            failure: Some(mode),
            ..Self::default()
        }
    }

    /// Fails only requests for `date`.
    pub fn failing_on(date: NaiveDate, mode: FailureMode) -> Self {
        Self {
            failure: Some(mode),
            fail_on: Some(date),
            ..Self::default()
        }
    }

    /// Number of `fetch_timings` calls observed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Dates requested so far, in call order.
    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        self.dates.lock().expect("dates lock").clone()
    }
}

#[async_trait]
impl TimingsProvider for FakeProvider {
    async fn fetch_timings(&self, _location: &Coordinate, date: NaiveDate) -> Result<TimingsData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dates.lock().expect("dates lock").push(date);

        match (self.failure, self.fail_on) {
            (Some(mode), None) => Err(mode.to_error()),
            (Some(mode), Some(day)) if day == date => Err(mode.to_error()),
            _ => Ok(sample_timings(date)),
        }
    }
}
