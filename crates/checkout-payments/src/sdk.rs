//! Payment Processor SDK Seam
//!
//! The vendor SDK is loaded at runtime and may or may not be present. This
//! module describes the capabilities the checkout needs from it; the host
//! (browser bindings, a native SDK wrapper, or a test double) implements
//! [`ProcessorSdk`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// A constructed processor client
pub trait PaymentClient: Send + Sync + fmt::Debug {
    /// Identifier assigned by the SDK, used in logs
    fn client_id(&self) -> &str;
}

/// Device-fingerprinting collector attached to the client
#[async_trait]
pub trait DeviceCollector: Send + Sync + fmt::Debug {
    /// Opaque device data string sent along with the payment credential
    fn device_data(&self) -> &str;

    async fn teardown(&self) -> std::result::Result<(), SdkError>;
}

/// Collector used when fraud-signal collection is unavailable
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCollector;

#[async_trait]
impl DeviceCollector for NoopCollector {
    fn device_data(&self) -> &str {
        ""
    }

    async fn teardown(&self) -> std::result::Result<(), SdkError> {
        Ok(())
    }
}

/// Payment rails
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Card,
    ApplePay,
    GooglePay,
    Paypal,
}

impl PaymentMethodKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
            Self::Paypal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constructed payment-method integration
pub trait PaymentMethod: Send + Sync + fmt::Debug {
    fn kind(&self) -> PaymentMethodKind;
}

/// Google Pay environment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GooglePayEnvironment {
    Production,
    Test,
}

impl GooglePayEnvironment {
    /// PRODUCTION only on the production checkout host
    pub fn for_host(checkout_host: &str, production_host: &str) -> Self {
        if checkout_host.eq_ignore_ascii_case(production_host) {
            Self::Production
        } else {
            Self::Test
        }
    }
}

/// Readiness probe sent to the wallet SDK
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsReadyToPayRequest {
    pub api_version: u8,
    pub api_version_minor: u8,
    pub existing_payment_method_required: bool,
}

impl Default for IsReadyToPayRequest {
    fn default() -> Self {
        Self {
            api_version: 2,
            api_version_minor: 0,
            existing_payment_method_required: false,
        }
    }
}

/// The wallet SDK's own payments client
#[async_trait]
pub trait GooglePaymentsClient: Send + Sync + fmt::Debug {
    async fn is_ready_to_pay(
        &self,
        request: &IsReadyToPayRequest,
    ) -> std::result::Result<bool, SdkError>;
}

pub type ClientHandle = Arc<dyn PaymentClient>;
pub type CollectorHandle = Arc<dyn DeviceCollector>;
pub type MethodHandle = Arc<dyn PaymentMethod>;
pub type GooglePaymentsClientHandle = Arc<dyn GooglePaymentsClient>;

/// Runtime-loaded processor SDK
#[async_trait]
pub trait ProcessorSdk: Send + Sync {
    /// Whether the vendor script is already present
    fn is_script_loaded(&self) -> bool;

    /// Load the vendor script, or wait for a load already in progress
    async fn load_script(&self) -> std::result::Result<(), SdkError>;

    async fn create_client(&self, authorization: &str)
    -> std::result::Result<ClientHandle, SdkError>;

    async fn create_data_collector(
        &self,
        client: &ClientHandle,
    ) -> std::result::Result<CollectorHandle, SdkError>;

    async fn create_hosted_fields(
        &self,
        client: &ClientHandle,
    ) -> std::result::Result<MethodHandle, SdkError>;

    async fn create_apple_pay(
        &self,
        client: &ClientHandle,
    ) -> std::result::Result<MethodHandle, SdkError>;

    /// Whether the wallet SDK's global object exists yet
    fn google_pay_global_available(&self) -> bool;

    async fn create_google_payments_client(
        &self,
        environment: GooglePayEnvironment,
    ) -> std::result::Result<GooglePaymentsClientHandle, SdkError>;

    async fn create_google_payment(
        &self,
        client: &ClientHandle,
        environment: GooglePayEnvironment,
    ) -> std::result::Result<MethodHandle, SdkError>;

    /// Whether the redirect rail's page-level script has loaded
    fn paypal_global_available(&self) -> bool;

    async fn create_paypal_checkout(
        &self,
        client: &ClientHandle,
    ) -> std::result::Result<MethodHandle, SdkError>;
}
