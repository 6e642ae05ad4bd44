//! Redirect rail (PayPal)

use super::{MethodAvailability, UnavailableReason};
use crate::sdk::{ClientHandle, MethodHandle, PaymentMethodKind, ProcessorSdk};

/// Needs the rail's page-level script to be loaded already.
pub async fn init_paypal(sdk: &dyn ProcessorSdk, client: &ClientHandle) -> MethodAvailability<MethodHandle> {
    if !sdk.paypal_global_available() {
        tracing::warn!(method = %PaymentMethodKind::Paypal, "PayPal SDK not loaded on page");
        return MethodAvailability::Unavailable(UnavailableReason::SdkMissing);
    }

    match sdk.create_paypal_checkout(client).await {
        Ok(checkout) => MethodAvailability::Available(checkout),
        Err(e) => {
            tracing::warn!(method = %PaymentMethodKind::Paypal, error = %e, "PayPal checkout construction failed");
            MethodAvailability::Unavailable(UnavailableReason::ConstructionFailed(e.to_string()))
        }
    }
}
