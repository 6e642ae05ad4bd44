//! Card rail (hosted fields)

use super::{MethodAvailability, UnavailableReason};
use crate::sdk::{ClientHandle, MethodHandle, PaymentMethodKind, ProcessorSdk};

/// No readiness check; a construction failure makes the rail temporarily
/// unavailable.
pub async fn init_card(sdk: &dyn ProcessorSdk, client: &ClientHandle) -> MethodAvailability<MethodHandle> {
    match sdk.create_hosted_fields(client).await {
        Ok(fields) => MethodAvailability::Available(fields),
        Err(e) => {
            tracing::warn!(method = %PaymentMethodKind::Card, error = %e, "Card fields unavailable");
            MethodAvailability::Unavailable(UnavailableReason::ConstructionFailed(e.to_string()))
        }
    }
}
