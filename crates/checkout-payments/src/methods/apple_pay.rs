//! Native wallet rail (Apple Pay)

use super::{MethodAvailability, UnavailableReason};
use crate::sdk::{ClientHandle, MethodHandle, PaymentMethodKind, ProcessorSdk};

/// Construction is attempted unconditionally; unsupported browsers reject it.
pub async fn init_apple_pay(
    sdk: &dyn ProcessorSdk,
    client: &ClientHandle,
) -> MethodAvailability<MethodHandle> {
    match sdk.create_apple_pay(client).await {
        Ok(apple_pay) => MethodAvailability::Available(apple_pay),
        Err(e) => {
            tracing::warn!(method = %PaymentMethodKind::ApplePay, error = %e, "Apple Pay not supported");
            MethodAvailability::Unavailable(UnavailableReason::Unsupported(e.to_string()))
        }
    }
}
