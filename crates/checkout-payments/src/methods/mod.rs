//! Payment Method Initializers
//!
//! One initializer per rail, each built from the session's client handle.
//! Every initializer keeps its failures to itself: a rail the device cannot
//! use comes back as [`MethodAvailability::Unavailable`] and the checkout
//! simply offers fewer buttons. The four run concurrently and complete in no
//! particular order.

mod apple_pay;
mod card;
mod google_pay;
mod paypal;

pub use apple_pay::init_apple_pay;
pub use card::init_card;
pub use google_pay::{GooglePayHandles, GooglePayOptions, init_google_pay};
pub use paypal::init_paypal;

use serde::Serialize;

use crate::sdk::{ClientHandle, MethodHandle, PaymentMethodKind, ProcessorSdk};

/// Why a rail is not offered. Never shown to the buyer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Browser or device does not support the rail
    Unsupported(String),

    /// Required global SDK object is missing
    SdkMissing,

    /// Global SDK object did not appear in time
    Timeout,

    /// Wallet reported it cannot pay on this device
    NotReady,

    /// Construction failed, rail temporarily unavailable
    ConstructionFailed(String),
}

/// Outcome of initializing one rail
#[derive(Clone, Debug)]
pub enum MethodAvailability<H> {
    Available(H),
    Unavailable(UnavailableReason),
}

impl<H> MethodAvailability<H> {
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn handle(&self) -> Option<&H> {
        match self {
            Self::Available(handle) => Some(handle),
            Self::Unavailable(_) => None,
        }
    }

    pub fn into_handle(self) -> Option<H> {
        match self {
            Self::Available(handle) => Some(handle),
            Self::Unavailable(_) => None,
        }
    }
}

/// All rails for one checkout session
#[derive(Debug)]
pub struct PaymentMethods {
    pub card: MethodAvailability<MethodHandle>,
    pub apple_pay: MethodAvailability<MethodHandle>,
    pub google_pay: MethodAvailability<GooglePayHandles>,
    pub paypal: MethodAvailability<MethodHandle>,
}

impl PaymentMethods {
    /// Rails that can be rendered
    pub fn available_kinds(&self) -> Vec<PaymentMethodKind> {
        [
            (PaymentMethodKind::Card, self.card.is_available()),
            (PaymentMethodKind::ApplePay, self.apple_pay.is_available()),
            (PaymentMethodKind::GooglePay, self.google_pay.is_available()),
            (PaymentMethodKind::Paypal, self.paypal.is_available()),
        ]
        .into_iter()
        .filter_map(|(kind, available)| available.then_some(kind))
        .collect()
    }
}

/// Initialize every rail concurrently
pub async fn init_all(
    sdk: &dyn ProcessorSdk,
    client: &ClientHandle,
    google_pay: &GooglePayOptions,
) -> PaymentMethods {
    let (card, apple_pay, google_pay, paypal) = futures::join!(
        init_card(sdk, client),
        init_apple_pay(sdk, client),
        init_google_pay(sdk, client, google_pay),
        init_paypal(sdk, client),
    );

    let methods = PaymentMethods {
        card,
        apple_pay,
        google_pay,
        paypal,
    };
    tracing::info!(available = ?methods.available_kinds(), "Payment methods initialized");
    methods
}
