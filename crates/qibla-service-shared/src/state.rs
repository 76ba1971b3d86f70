//! Application state for HTTP services.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the prayer times provider.

use std::sync::Arc;

use qibla_lib::{AladhanClient, Error as LibError, TimingsProvider};

use crate::config::ServiceConfig;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The provider base URL is not an http(s) URL.
    InvalidBaseUrl(String),

    /// The outbound HTTP client could not be built.
    ProviderClient(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl(url) => {
                write!(f, "prayer times base URL must start with http:// or https://: {}", url)
            }
            Self::ProviderClient(e) => write!(f, "failed to build prayer times client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ProviderClient(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::ProviderClient(err)
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor. It holds no per-request data.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use qibla_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let provider = state.provider();
///     // ... fetch timings
/// }
///
/// let state = AppState::from_config(&ServiceConfig::from_env()).unwrap();
/// let app = Router::new()
///     .route("/api/prayer-times/{lat}/{lng}", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    provider: Arc<dyn TimingsProvider>,
    provider_name: String,
}

impl AppState {
    /// Build state backed by the AlAdhan client described in `config`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AppStateError> {
        let base_url = &config.provider.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppStateError::InvalidBaseUrl(base_url.clone()));
        }

        let client = AladhanClient::new(config.provider.clone())?;
        tracing::info!(
            base_url = %base_url,
            timeout_secs = config.provider.timeout.as_secs(),
            "prayer times client ready"
        );

        Ok(Self::with_provider(Arc::new(client), base_url.clone()))
    }

    /// Create state around any provider implementation.
    ///
    /// This is useful for testing with a scripted provider.
    pub fn with_provider(provider: Arc<dyn TimingsProvider>, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                provider,
                provider_name: name.into(),
            }),
        }
    }

    /// Access the prayer times provider.
    pub fn provider(&self) -> &dyn TimingsProvider {
        self.inner.provider.as_ref()
    }

    /// Human-readable identifier of the provider (its base URL in production).
    pub fn provider_name(&self) -> &str {
        &self.inner.provider_name
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.inner.provider_name)
            .finish()
    }
}
