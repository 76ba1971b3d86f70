//! Test utilities for service handler testing.
//!
//! Builds [`AppState`] around the scripted provider from
//! `qibla_lib::test_helpers` so handlers never touch the network.

use std::sync::Arc;

pub use qibla_lib::test_helpers::{sample_timings, FailureMode, FakeProvider, PROVIDER_DATE_FORMAT};

use crate::state::AppState;

/// Provider name reported by fake-backed state.
pub const FAKE_PROVIDER_NAME: &str = "fake-provider";

/// Known locations used across service tests.
pub mod fixture_locations {
    /// New York City.
    pub const NEW_YORK: (f64, f64) = (40.7128, -74.0060);

    /// London.
    pub const LONDON: (f64, f64) = (51.5074, -0.1278);

    /// Sydney.
    pub const SYDNEY: (f64, f64) = (-33.8688, 151.2093);

    /// The Kaaba itself.
    pub const MECCA: (f64, f64) = (21.4225, 39.8262);
}

/// State backed by `provider`, also returned so tests can inspect its calls.
pub fn state_with(provider: FakeProvider) -> (AppState, Arc<FakeProvider>) {
    let provider = Arc::new(provider);
    let state = AppState::with_provider(provider.clone(), FAKE_PROVIDER_NAME);
    (state, provider)
}

/// State whose provider always succeeds.
pub fn test_state() -> AppState {
    state_with(FakeProvider::succeeding()).0
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-{}-{}", timestamp, SEQUENCE.fetch_add(1, Ordering::Relaxed))
}
