//! Error Types

use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Generic text shown for failures the buyer cannot act on
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while processing your purchase. Please contact support.";

/// Checkout error types
///
/// Unavailable payment methods are not errors; see `MethodAvailability` in
/// `checkout-payments`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Purchase submission answered HTTP 401, the buyer must sign in again
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Server rejected the payment with a business error code
    #[error("Payment failed ({code}): {message}")]
    Payment { code: String, message: String },

    /// Transport error, malformed response or a required SDK missing.
    /// `detail` is for logs, never for display.
    #[error("Integration error: {detail}")]
    Integration { detail: String },

    /// Quote lookup returned something that cannot be merged
    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    pub fn integration(detail: impl Into<String>) -> Self {
        Self::Integration {
            detail: detail.into(),
        }
    }

    pub fn payment(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Payment {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in API error bodies
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Authorization(_) => "AUTHORIZATION_FAILED",
            Self::Payment { .. } => "PAYMENT_FAILED",
            Self::Integration { .. } => "INTEGRATION_FAILED",
            Self::InvalidQuote(_) => "INVALID_QUOTE",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Authorization(_) => {
                "Your session has expired. Please sign in again to complete your purchase.".into()
            }
            Self::Payment { message, .. } => message.clone(),
            Self::InvalidQuote(_) => "This quote is no longer available.".into(),
            Self::Integration { .. } | Self::Config(_) => GENERIC_FAILURE_MESSAGE.into(),
        }
    }
}
