//! Quote Reconciliation
//!
//! Merges the quote lookup (which knows the true payment count) into the
//! selected offer and fills in discount labels.

use serde::Serialize;

use crate::model::{Purchasable, PurchasableOffer, QuoteLookupResult, QuoteTerms};
use crate::pricing::{discount_label, installment_split};

/// Everything the checkout page needs to price its offers
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledCheckout {
    pub selected: Purchasable,
    pub alternatives: Vec<PurchasableOffer>,
}

/// Compute a discount label unless one was supplied externally
#[must_use]
pub fn with_discount_label(mut offer: PurchasableOffer) -> PurchasableOffer {
    if offer.discount_label.is_none() {
        offer.discount_label = discount_label(offer.old_price_cents, offer.price_cents);
    }
    offer
}

/// Overlay quote terms onto `offer`. Without a lookup the offer passes through.
pub fn merge_into_purchasable(
    offer: PurchasableOffer,
    quote_lookup: Option<&QuoteLookupResult>,
) -> Purchasable {
    let Some(lookup) = quote_lookup else {
        return Purchasable::from(offer);
    };

    let split = installment_split(offer.price_cents, lookup.number_of_payments);
    let (first_installment_cents, second_installment_cents) = if split.has_installments {
        (Some(split.first_cents), Some(split.second_cents))
    } else {
        (None, None)
    };

    tracing::debug!(
        offer_id = %offer.id,
        quote_id = %lookup.quote_id,
        number_of_payments = lookup.number_of_payments,
        has_installments = split.has_installments,
        "Merged quote into purchasable"
    );

    Purchasable {
        offer,
        quote: Some(QuoteTerms {
            has_installments: split.has_installments,
            is_package: lookup.is_package,
            number_of_payments: lookup.number_of_payments,
            first_installment_cents,
            second_installment_cents,
        }),
    }
}

/// Build the checkout view. Installments apply to the selected offer only;
/// alternatives are always shown without installment detail.
pub fn reconcile(
    selected: PurchasableOffer,
    alternatives: Vec<PurchasableOffer>,
    quote_lookup: Option<&QuoteLookupResult>,
) -> ReconciledCheckout {
    ReconciledCheckout {
        selected: merge_into_purchasable(with_discount_label(selected), quote_lookup),
        alternatives: alternatives.into_iter().map(with_discount_label).collect(),
    }
}
