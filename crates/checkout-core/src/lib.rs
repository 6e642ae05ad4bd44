//! # checkout-core
//!
//! Pure checkout domain for the tutoring marketplace: what can be bought, what
//! it costs today, and how a failed purchase is classified.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       checkout-core                          │
//! │  ┌─────────────┐   ┌──────────────────┐   ┌──────────────┐   │
//! │  │  PriceMath  │◀──│ QuoteReconciler  │   │ RetryPolicy  │   │
//! │  │ (pricing)   │   │ (reconcile)      │   │ (retry)      │   │
//! │  └─────────────┘   └──────────────────┘   └──────────────┘   │
//! │                 model  ·  error (CheckoutError)              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate performs I/O. The async orchestration lives in
//! `checkout-payments`.

pub mod error;
pub mod model;
pub mod pricing;
pub mod reconcile;
pub mod retry;

pub use error::{CheckoutError, Result};
pub use model::{
    InstallmentBreakdown, ProductKind, Purchasable, PurchasableOffer, QuoteLookupResult, QuoteTerms,
};
pub use pricing::{discount_label, installment_split};
pub use reconcile::{ReconciledCheckout, merge_into_purchasable, reconcile, with_discount_label};
pub use retry::{RetryPolicy, RetryState};
