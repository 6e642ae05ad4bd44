//! Checkout Configuration

use std::time::Duration;

use checkout_core::CheckoutError;

use crate::error::Result;

/// Runtime configuration for the payment core
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Purchase mutation endpoint
    pub graphql_url: String,

    /// REST base for offer and quote lookups
    pub api_url: String,

    /// Host that selects the PRODUCTION wallet environment
    pub production_host: String,

    /// How long to wait for the wallet SDK global
    pub wallet_poll_timeout: Duration,

    /// Delay between wallet SDK global checks
    pub wallet_poll_interval: Duration,

    /// Quote item types classified as packages
    pub package_type_ids: Vec<u32>,

    /// Whether server-flagged retryable failures are resubmitted once
    pub retry_enabled: bool,

    /// Timeout applied to every backend request
    pub request_timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            graphql_url: "http://localhost:4000/graphql".into(),
            api_url: "http://localhost:4000/api".into(),
            production_host: "checkout.tutorhub.com".into(),
            wallet_poll_timeout: Duration::from_millis(2500),
            wallet_poll_interval: Duration::from_millis(50),
            package_type_ids: vec![2, 5],
            retry_enabled: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CheckoutConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let package_type_ids = match std::env::var("CHECKOUT_PACKAGE_TYPE_IDS") {
            Ok(raw) => parse_id_list(&raw)?,
            Err(_) => defaults.package_type_ids,
        };

        Ok(Self {
            graphql_url: std::env::var("CHECKOUT_GRAPHQL_URL").unwrap_or(defaults.graphql_url),
            api_url: std::env::var("CHECKOUT_API_URL").unwrap_or(defaults.api_url),
            production_host: std::env::var("CHECKOUT_PRODUCTION_HOST")
                .unwrap_or(defaults.production_host),
            wallet_poll_timeout: env_millis("CHECKOUT_WALLET_POLL_TIMEOUT_MS")
                .unwrap_or(defaults.wallet_poll_timeout),
            wallet_poll_interval: env_millis("CHECKOUT_WALLET_POLL_INTERVAL_MS")
                .unwrap_or(defaults.wallet_poll_interval),
            package_type_ids,
            retry_enabled: std::env::var("CHECKOUT_RETRY_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_enabled),
            request_timeout: std::env::var("CHECKOUT_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.request_timeout, Duration::from_secs),
        })
    }

    /// Shared HTTP client for backend calls
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| CheckoutError::Config(e.to_string()))
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
}

fn parse_id_list(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| CheckoutError::Config(format!("invalid package type id: {s}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.wallet_poll_timeout, Duration::from_millis(2500));
        assert_eq!(config.wallet_poll_interval, Duration::from_millis(50));
        assert!(config.retry_enabled);
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("2, 5,9").unwrap(), vec![2, 5, 9]);
        assert_eq!(parse_id_list("").unwrap(), Vec::<u32>::new());
        assert!(matches!(parse_id_list("2,x"), Err(CheckoutError::Config(_))));
    }
}
