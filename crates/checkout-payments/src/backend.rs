//! Offer and Quote Lookups
//!
//! REST lookups feeding the reconciler. The quote lookup is the only source of
//! the true payment count.

use async_trait::async_trait;
use checkout_core::{CheckoutError, PurchasableOffer, QuoteLookupResult, ReconciledCheckout, reconcile};
use futures::future::try_join_all;
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Quote record as served by the backend
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct QuoteRecord {
    pub id: String,
    pub number_of_payments: u8,
    pub item_type_id: u32,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl QuoteRecord {
    /// Classify against the package allow-list
    pub fn into_lookup(self, package_type_ids: &[u32]) -> Result<QuoteLookupResult> {
        if !matches!(self.number_of_payments, 1 | 2) {
            return Err(CheckoutError::InvalidQuote(format!(
                "quote {} has {} payments",
                self.id, self.number_of_payments
            )));
        }

        Ok(QuoteLookupResult {
            is_package: package_type_ids.contains(&self.item_type_id),
            quote_id: self.id,
            number_of_payments: self.number_of_payments,
            item_id: self.item_id,
            user_id: self.user_id,
        })
    }
}

#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn fetch_offer(&self, offer_id: &str) -> Result<PurchasableOffer>;

    async fn fetch_quote(&self, quote_id: &str) -> Result<QuoteLookupResult>;
}

/// reqwest-backed [`CheckoutBackend`]
#[derive(Clone, Debug)]
pub struct HttpCheckoutBackend {
    http: reqwest::Client,
    base_url: String,
    package_type_ids: Vec<u32>,
}

impl HttpCheckoutBackend {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, package_type_ids: Vec<u32>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            package_type_ids,
        }
    }

    /// `{base_url}/{collection}/{id}`, with `id` escaped as a single path segment
    fn resource_url(&self, collection: &str, id: &str) -> std::result::Result<reqwest::Url, ApiError> {
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(collection)
            .push(id);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: reqwest::Url) -> std::result::Result<T, ApiError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CheckoutBackend for HttpCheckoutBackend {
    async fn fetch_offer(&self, offer_id: &str) -> Result<PurchasableOffer> {
        let url = self.resource_url("offers", offer_id)?;
        Ok(self.get_json(url).await?)
    }

    async fn fetch_quote(&self, quote_id: &str) -> Result<QuoteLookupResult> {
        let url = self.resource_url("quotes", quote_id)?;
        let record: QuoteRecord = self.get_json(url).await?;
        record.into_lookup(&self.package_type_ids)
    }
}

/// Fetch the selected offer, its alternatives and (when a quote id is given)
/// the quote, then reconcile them.
///
/// A failed quote lookup degrades to showing the offer without installments.
pub async fn load_checkout(
    backend: &dyn CheckoutBackend,
    offer_id: &str,
    alternative_ids: &[String],
    quote_id: Option<&str>,
) -> Result<ReconciledCheckout> {
    let quote = async {
        match quote_id {
            Some(id) => backend
                .fetch_quote(id)
                .await
                .map_err(|e| tracing::warn!(quote_id = %id, error = %e, "Quote lookup failed"))
                .ok(),
            None => None,
        }
    };
    let offers = async {
        let selected = backend.fetch_offer(offer_id).await?;
        let alternatives = try_join_all(alternative_ids.iter().map(|id| backend.fetch_offer(id))).await?;
        Ok::<_, CheckoutError>((selected, alternatives))
    };

    let (quote, offers) = futures::join!(quote, offers);
    let (selected, alternatives) = offers?;

    Ok(reconcile(selected, alternatives, quote.as_ref()))
}
