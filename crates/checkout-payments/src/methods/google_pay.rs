//! Web wallet rail (Google Pay)
//!
//! Two phases: wait (bounded) for the wallet SDK's global object, then build
//! the wallet's payments client and the processor integration and ask the
//! wallet whether it can pay. Every "no" along the way is a silent
//! unavailability.

use std::time::Duration;

use super::{MethodAvailability, UnavailableReason};
use crate::config::CheckoutConfig;
use crate::sdk::{
    ClientHandle, GooglePayEnvironment, GooglePaymentsClientHandle, IsReadyToPayRequest,
    MethodHandle, PaymentMethodKind, ProcessorSdk,
};

/// Both handles the wallet button needs
#[derive(Clone, Debug)]
pub struct GooglePayHandles {
    pub payments_client: GooglePaymentsClientHandle,
    pub google_payment: MethodHandle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GooglePayOptions {
    pub environment: GooglePayEnvironment,
    pub poll_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for GooglePayOptions {
    fn default() -> Self {
        Self {
            environment: GooglePayEnvironment::Test,
            poll_timeout: Duration::from_millis(2500),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl GooglePayOptions {
    /// Options for a checkout served from `checkout_host`
    pub fn for_host(config: &CheckoutConfig, checkout_host: &str) -> Self {
        Self {
            environment: GooglePayEnvironment::for_host(checkout_host, &config.production_host),
            poll_timeout: config.wallet_poll_timeout,
            poll_interval: config.wallet_poll_interval,
        }
    }
}

async fn wait_for_global(sdk: &dyn ProcessorSdk, options: &GooglePayOptions) -> bool {
    let poll = async {
        while !sdk.google_pay_global_available() {
            tokio::time::sleep(options.poll_interval).await;
        }
    };
    tokio::time::timeout(options.poll_timeout, poll).await.is_ok()
}

pub async fn init_google_pay(
    sdk: &dyn ProcessorSdk,
    client: &ClientHandle,
    options: &GooglePayOptions,
) -> MethodAvailability<GooglePayHandles> {
    if !wait_for_global(sdk, options).await {
        tracing::warn!(
            method = %PaymentMethodKind::GooglePay,
            timeout = ?options.poll_timeout,
            "Google Pay SDK did not load in time"
        );
        return MethodAvailability::Unavailable(UnavailableReason::Timeout);
    }

    let payments_client = match sdk.create_google_payments_client(options.environment).await {
        Ok(payments_client) => payments_client,
        Err(e) => return unavailable(&e.to_string()),
    };

    let google_payment = match sdk.create_google_payment(client, options.environment).await {
        Ok(google_payment) => google_payment,
        Err(e) => return unavailable(&e.to_string()),
    };

    match payments_client
        .is_ready_to_pay(&IsReadyToPayRequest::default())
        .await
    {
        Ok(true) => MethodAvailability::Available(GooglePayHandles {
            payments_client,
            google_payment,
        }),
        Ok(false) => {
            tracing::debug!(method = %PaymentMethodKind::GooglePay, "Google Pay not ready to pay");
            MethodAvailability::Unavailable(UnavailableReason::NotReady)
        }
        Err(e) => unavailable(&e.to_string()),
    }
}

fn unavailable(detail: &str) -> MethodAvailability<GooglePayHandles> {
    tracing::warn!(method = %PaymentMethodKind::GooglePay, error = %detail, "Google Pay unavailable");
    MethodAvailability::Unavailable(UnavailableReason::ConstructionFailed(detail.to_string()))
}
