//! Service configuration read from the environment at startup.
//!
//! # Environment Variables
//!
//! - `SERVICE_PORT`: HTTP port (default: 8080)
//! - `PRAYER_API_BASE_URL`: prayer times provider base URL
//!   (default: `https://api.aladhan.com/v1`)
//! - `PRAYER_API_TIMEOUT_SECS`: outbound request timeout (default: 10)

use std::time::Duration;

use qibla_lib::{ProviderConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for a Qibla Finder HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Port to bind on all interfaces.
    pub port: u16,
    /// Outbound prayer times provider settings.
    pub provider: ProviderConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            provider: ProviderConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Tests use this to avoid mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("SERVICE_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let base_url = lookup("PRAYER_API_BASE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = lookup("PRAYER_API_TIMEOUT_SECS")
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            port,
            provider: ProviderConfig { base_url, timeout },
        }
    }
}
