//! Purchase Request and Outcome
//!
//! Builds the purchase mutation input from what the buyer entered and the
//! tracking context of the visit, and describes the success payload.

use cookie::Cookie;
use serde::{Deserialize, Serialize};

/// Billing country when the currency is not in the table
pub const DEFAULT_COUNTRY: &str = "US";

/// Billing country implied by the offer's currency
pub fn country_for_currency(currency: &str) -> &'static str {
    match currency.to_ascii_uppercase().as_str() {
        "CAD" => "CA",
        "GBP" => "GB",
        "AUD" => "AU",
        "NZD" => "NZ",
        "EUR" => "IE",
        _ => DEFAULT_COUNTRY,
    }
}

/// What is being bought
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ItemReference {
    Offer(String),
    Quote(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub country_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Tokenized payment credential block.
///
/// New cards carry a billing address; stored methods carry their identifier
/// instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub nonce: String,
    pub device_data: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_payment_method_id: Option<String>,
}

/// Attribution attached to every purchase
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_item_id: Option<String>,
}

const LANDING_PAGE_COOKIE: &str = "landing_page";
const REFERRER_COOKIE: &str = "referrer";
const VISITOR_ID_COOKIE: &str = "visitor_id";
const ENROLLMENT_ITEM_PARAM: &str = "enrollment_item_id";

impl TrackingInput {
    /// Read the tracking cookies from a `Cookie` header value.
    ///
    /// Values are percent-decoded and stripped of surrounding quotes. Pairs
    /// that fail to parse are skipped.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut tracking = Self::default();

        for cookie in Cookie::split_parse_encoded(header).filter_map(std::result::Result::ok) {
            let value = cookie.value_trimmed();
            if value.is_empty() {
                continue;
            }
            let field = match cookie.name() {
                LANDING_PAGE_COOKIE => &mut tracking.landing_page,
                REFERRER_COOKIE => &mut tracking.referrer,
                VISITOR_ID_COOKIE => &mut tracking.visitor_id,
                _ => continue,
            };
            *field = Some(value.to_string());
        }

        tracking
    }

    /// Pick up the enrollment item from the checkout URL, if present
    #[must_use]
    pub fn with_enrollment_from_url(mut self, url: &str) -> Self {
        if let Ok(url) = reqwest::Url::parse(url) {
            self.enrollment_item_id = url
                .query_pairs()
                .find(|(key, _)| key == ENROLLMENT_ITEM_PARAM)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty());
        }
        self
    }
}

/// Purchase mutation input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInput {
    /// Buyer reference; `None` for guest checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,

    pub payment: PaymentInput,
    pub tracking: TrackingInput,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    #[serde(default)]
    pub is_churned: bool,

    #[serde(default)]
    pub is_resubmission: bool,

    /// Bot-verification token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

/// What the buyer submitted at checkout
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSubmission {
    #[serde(default)]
    pub user_id: Option<String>,
    pub item: Option<ItemReference>,
    pub currency: String,
    pub nonce: String,
    #[serde(default)]
    pub device_data: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub stored_payment_method_id: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub is_churned: bool,
    #[serde(default)]
    pub is_resubmission: bool,
    #[serde(default)]
    pub verification_token: Option<String>,
}

impl CheckoutSubmission {
    /// Build the mutation input. A stored payment method omits the billing
    /// address; a new card derives the country from the currency.
    pub fn into_input(self, tracking: TrackingInput) -> PurchaseInput {
        let payment = match self.stored_payment_method_id.filter(|id| !id.is_empty()) {
            Some(stored_id) => PaymentInput {
                nonce: self.nonce,
                device_data: self.device_data,
                billing_address: None,
                stored_payment_method_id: Some(stored_id),
            },
            None => PaymentInput {
                nonce: self.nonce,
                device_data: self.device_data,
                billing_address: Some(BillingAddress {
                    country_code: country_for_currency(&self.currency).to_string(),
                    postal_code: self.postal_code,
                }),
                stored_payment_method_id: None,
            },
        };

        let (offer_id, quote_id) = match self.item {
            Some(ItemReference::Offer(id)) => (Some(id), None),
            Some(ItemReference::Quote(id)) => (None, Some(id)),
            None => (None, None),
        };

        PurchaseInput {
            user_id: self.user_id,
            offer_id,
            quote_id,
            payment,
            tracking,
            promo_code: self.promo_code.filter(|code| !code.trim().is_empty()),
            is_churned: self.is_churned,
            is_resubmission: self.is_resubmission,
            verification_token: self.verification_token,
        }
    }
}

/// Tokens for an account created during guest checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Successful purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSuccess {
    /// Where to send the buyer next
    pub destination_path: String,

    #[serde(default)]
    pub account_tokens: Option<AccountTokens>,

    #[serde(rename = "paymentID")]
    pub payment_id: String,
}
