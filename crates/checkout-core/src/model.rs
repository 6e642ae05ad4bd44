//! Domain Models
//!
//! Offers, quotes and the purchasable view shown at checkout.
//! All amounts are integer minor units (cents).

use serde::{Deserialize, Serialize};

/// Whether an offer comes from the catalog or a negotiated quote
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Catalog,
    Quote,
}

/// One buyable item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasableOffer {
    pub id: String,

    /// Display name
    pub name: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// Price in cents
    pub price_cents: i64,

    /// Prior price in cents, shown struck through when above `price_cents`
    #[serde(default)]
    pub old_price_cents: Option<i64>,

    /// Entitlement size in tutoring hours
    #[serde(default)]
    pub hours: u32,

    #[serde(default)]
    pub kind: ProductKind,

    /// Externally supplied discount label; always wins over a computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_label: Option<String>,
}

impl PurchasableOffer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        price_cents: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            currency: currency.into().to_uppercase(),
            price_cents,
            old_price_cents: None,
            hours: 0,
            kind: ProductKind::Catalog,
            discount_label: None,
        }
    }

    #[must_use]
    pub const fn with_old_price(mut self, old_price_cents: i64) -> Self {
        self.old_price_cents = Some(old_price_cents);
        self
    }

    #[must_use]
    pub const fn with_hours(mut self, hours: u32) -> Self {
        self.hours = hours;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: ProductKind) -> Self {
        self.kind = kind;
        self
    }

    /// A discount is only shown when the prior price is above the price
    pub fn has_discount(&self) -> bool {
        self.price_cents >= 0 && self.old_price_cents.is_some_and(|old| old > self.price_cents)
    }
}

/// How an offer's price is collected. Derived, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentBreakdown {
    pub has_installments: bool,
    pub first_cents: i64,
    pub second_cents: i64,
}

impl InstallmentBreakdown {
    /// The whole total collected today
    pub const fn single(total_cents: i64) -> Self {
        Self {
            has_installments: false,
            first_cents: total_cents,
            second_cents: 0,
        }
    }

    pub const fn total_cents(&self) -> i64 {
        self.first_cents + self.second_cents
    }
}

/// Result of the quote-specific lookup. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLookupResult {
    pub quote_id: String,

    /// True payment count (1 or 2)
    pub number_of_payments: u8,

    /// Package product rather than a membership
    pub is_package: bool,

    #[serde(default)]
    pub item_id: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,
}

/// Quote-derived fields overlaid onto the selected offer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTerms {
    pub has_installments: bool,
    pub is_package: bool,
    pub number_of_payments: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_installment_cents: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_installment_cents: Option<i64>,
}

/// An offer as presented at checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchasable {
    #[serde(flatten)]
    pub offer: PurchasableOffer,

    #[serde(flatten)]
    pub quote: Option<QuoteTerms>,
}

impl Purchasable {
    pub const fn has_installments(&self) -> bool {
        match &self.quote {
            Some(terms) => terms.has_installments,
            None => false,
        }
    }

    /// Amount charged at purchase time
    pub fn due_today_cents(&self) -> i64 {
        self.quote
            .as_ref()
            .and_then(|terms| terms.first_installment_cents)
            .unwrap_or(self.offer.price_cents)
    }
}

impl From<PurchasableOffer> for Purchasable {
    fn from(offer: PurchasableOffer) -> Self {
        Self { offer, quote: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_requires_higher_old_price() {
        let offer = PurchasableOffer::new("o1", "10 hours", "usd", 50_000);
        assert!(!offer.has_discount());
        assert!(offer.clone().with_old_price(62_500).has_discount());
        assert!(!offer.with_old_price(50_000).has_discount());
    }

    #[test]
    fn test_purchasable_serializes_without_quote_fields() {
        let purchasable = Purchasable::from(PurchasableOffer::new("o1", "Starter", "USD", 9_900));
        let json = serde_json::to_value(&purchasable).unwrap();
        assert_eq!(json["priceCents"], 9_900);
        assert!(json.get("hasInstallments").is_none());
        assert!(json.get("firstInstallmentCents").is_none());
    }

    #[test]
    fn test_due_today_uses_first_installment() {
        let purchasable = Purchasable {
            offer: PurchasableOffer::new("q1", "Package", "USD", 199_900),
            quote: Some(QuoteTerms {
                has_installments: true,
                is_package: true,
                number_of_payments: 2,
                first_installment_cents: Some(100_000),
                second_installment_cents: Some(99_900),
            }),
        };
        assert_eq!(purchasable.due_today_cents(), 100_000);
        assert!(purchasable.has_installments());
    }
}
