//! Application State

use std::sync::Arc;

use checkout_payments::{CheckoutBackend, CheckoutConfig, RetryTelemetry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CheckoutConfig>,

    /// HTTP client reused for every purchase submission
    pub http: reqwest::Client,

    /// Offer and quote lookups
    pub backend: Arc<dyn CheckoutBackend>,

    /// Sink for automatic-retry events
    pub telemetry: Arc<dyn RetryTelemetry>,
}
