//! # checkout-payments
//!
//! Payment orchestration core of the checkout.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────────────┐   client   ┌────────────────────────────┐
//! │ PaymentClientManager │──────────▶│ card · apple pay ·          │
//! │ (single-flight)      │            │ google pay · paypal         │
//! └──────────────────────┘            └────────────────────────────┘
//!                                                  │ nonce
//!                                                  ▼
//! ┌──────────────────────┐  input   ┌──────────────────────────────┐
//! │ CheckoutSubmission   │────────▶│ PurchaseOrchestrator          │──▶ PurchaseApi
//! └──────────────────────┘          │ (one automatic retry)        │
//!                                   └──────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_payments::{PaymentClientManager, methods};
//!
//! let manager = PaymentClientManager::new(sdk);
//! let (client, collector) = manager.initialize(&auth_token).await?;
//! let methods = methods::init_all(manager.sdk(), &client, &google_pay_options).await;
//!
//! // ... buyer picks a rail and the SDK returns a nonce ...
//!
//! let input = submission.into_input(tracking);
//! let mut policy = RetryPolicy::new();
//! let outcome = orchestrator.purchase(&input, &mut policy).await?;
//! ```

pub mod api;
pub mod backend;
pub mod client_manager;
pub mod config;
pub mod error;
pub mod methods;
pub mod orchestrator;
pub mod purchase;
pub mod sdk;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use api::{GraphqlPurchaseApi, PurchaseApi, PurchaseResponse};
pub use backend::{CheckoutBackend, HttpCheckoutBackend, load_checkout};
pub use client_manager::PaymentClientManager;
pub use config::CheckoutConfig;
pub use error::{ApiError, Result, SdkError};
pub use methods::{MethodAvailability, PaymentMethods, UnavailableReason};
pub use orchestrator::PurchaseOrchestrator;
pub use purchase::{CheckoutSubmission, PurchaseInput, PurchaseSuccess, TrackingInput};
pub use sdk::ProcessorSdk;
pub use telemetry::{RetryAttemptEvent, RetryTelemetry, TracingRetryTelemetry};

// Re-export core types for convenience
pub use checkout_core::{CheckoutError, RetryPolicy};
