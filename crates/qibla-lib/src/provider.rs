//! Outbound prayer timings provider.
//!
//! [`TimingsProvider`] is the single seam between the library and the
//! third-party timing API. [`AladhanClient`] talks to the AlAdhan `timings`
//! endpoint; tests substitute a scripted fake.
//!
//! Responses are treated as untrusted: every field is optional at the
//! deserialization layer and checked when the schedule is formatted.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geodesy::Coordinate;

/// Default AlAdhan API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.aladhan.com/v1";

/// Calculation method id for the Islamic Society of North America convention.
pub const CALCULATION_METHOD_ISNA: u8 = 2;

/// Default bound on a single outbound request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Success code reported inside the provider's JSON envelope.
const PROVIDER_SUCCESS_CODE: i64 = 200;

/// Provider-shaped timings document (the `data` object of an AlAdhan reply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingsData {
    /// Raw time values keyed by provider name (`Fajr`, `Sunrise`, ...).
    #[serde(default)]
    pub timings: BTreeMap<String, String>,
    #[serde(default)]
    pub date: Option<DateInfo>,
    #[serde(default)]
    pub meta: Option<MetaInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateInfo {
    #[serde(default)]
    pub readable: Option<String>,
    #[serde(default)]
    pub gregorian: Option<GregorianDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GregorianDate {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaInfo {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub method: Option<MethodInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// Source of raw prayer timings for a location and calendar date.
#[async_trait]
pub trait TimingsProvider: Send + Sync {
    /// Fetch the provider's timings document for `location` on `date`.
    async fn fetch_timings(&self, location: &Coordinate, date: NaiveDate) -> Result<TimingsData>;
}

/// Settings for [`AladhanClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL without the trailing `/timings` path.
    pub base_url: String,
    /// Bound applied to each outbound request.
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the AlAdhan timings API.
#[derive(Debug, Clone)]
pub struct AladhanClient {
    client: Client,
    config: ProviderConfig,
}

impl AladhanClient {
    /// Build a client with the configured timeout.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn timings_url(&self, timestamp: i64) -> String {
        format!(
            "{}/timings/{}",
            self.config.base_url.trim_end_matches('/'),
            timestamp
        )
    }

    fn classify_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::UpstreamTimeout {
                timeout: self.config.timeout,
            }
        } else if err.is_decode() {
            Error::malformed(err.to_string())
        } else {
            Error::UpstreamUnavailable {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl TimingsProvider for AladhanClient {
    async fn fetch_timings(&self, location: &Coordinate, date: NaiveDate) -> Result<TimingsData> {
        let timestamp = midnight_timestamp(date);
        let url = self.timings_url(timestamp);
        let started = Instant::now();

        debug!(
            url = %url,
            latitude = location.latitude(),
            longitude = location.longitude(),
            %date,
            "requesting prayer timings"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.latitude().to_string()),
                ("longitude", location.longitude().to_string()),
                ("method", CALCULATION_METHOD_ISNA.to_string()),
                ("timestamp", timestamp.to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_transport(e))?;

        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prayer timings response received"
        );

        let envelope: Envelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(Error::UpstreamLogicalFailure {
                    code: i64::from(status.as_u16()),
                    status: status.canonical_reason().unwrap_or("unknown").to_string(),
                });
            }
            Err(e) => return Err(Error::malformed(e.to_string())),
        };

        if !status.is_success() || envelope.code != Some(PROVIDER_SUCCESS_CODE) {
            let code = envelope.code.unwrap_or_else(|| i64::from(status.as_u16()));
            let status_text = envelope.status_text();
            warn!(code, status = %status_text, "prayer times provider declined request");
            return Err(Error::UpstreamLogicalFailure {
                code,
                status: status_text,
            });
        }

        let data = envelope
            .data
            .ok_or_else(|| Error::malformed("response has no data object"))?;
        serde_json::from_value(data).map_err(|e| Error::malformed(e.to_string()))
    }
}

/// Top-level AlAdhan reply. `data` holds a timings document on success and
/// usually an error string otherwise, so it is decoded in a second step.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl Envelope {
    fn status_text(&self) -> String {
        match (&self.status, &self.data) {
            (Some(serde_json::Value::String(s)), Some(serde_json::Value::String(d))) => {
                format!("{}: {}", s, d)
            }
            (Some(serde_json::Value::String(s)), _) => s.clone(),
            (Some(other), _) => other.to_string(),
            (None, _) => "unknown".to_string(),
        }
    }
}

/// Unix timestamp of `date` at 00:00 UTC.
pub fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn user_agent() -> String {
    format!("qibla-finder/{}", env!("CARGO_PKG_VERSION"))
}
