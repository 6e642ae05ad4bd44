//! Payment Error Types

use checkout_core::CheckoutError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Failures reported by the payment-processor SDK.
///
/// `Clone` so one in-flight creation can hand the same failure to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// Vendor script could not be loaded or parsed
    #[error("SDK script failed to load: {0}")]
    ScriptLoad(String),

    /// Client or component construction rejected
    #[error("SDK construction failed: {0}")]
    Construction(String),

    /// The browser or device cannot use this rail
    #[error("Not supported on this device: {0}")]
    Unsupported(String),

    /// Teardown of a component failed
    #[error("SDK teardown failed: {0}")]
    Teardown(String),
}

impl From<SdkError> for CheckoutError {
    fn from(err: SdkError) -> Self {
        Self::integration(err.to_string())
    }
}

/// Transport-level failures talking to the checkout backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 401
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Request never completed
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configured base URL cannot carry a path
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl From<ApiError> for CheckoutError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::Authorization("purchase submission returned 401".into()),
            other => Self::integration(other.to_string()),
        }
    }
}
