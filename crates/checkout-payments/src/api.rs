//! Purchase API
//!
//! The purchase mutation over GraphQL-on-HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::purchase::{PurchaseInput, PurchaseSuccess};

const PURCHASE_MUTATION: &str = r"mutation Purchase($input: PurchaseInput!) {
  purchase(input: $input) {
    destinationPath
    paymentID
    accountTokens { accessToken refreshToken }
  }
}";

/// Extensions the server attaches to an error entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub is_retryable: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,

    #[serde(default)]
    pub extensions: Option<ErrorExtensions>,
}

impl GraphqlError {
    pub fn is_retryable(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.is_retryable)
            .unwrap_or(false)
    }

    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|ext| ext.code.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseData {
    #[serde(default)]
    pub purchase: Option<PurchaseSuccess>,
}

/// Body of a purchase mutation response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    #[serde(default)]
    pub data: Option<PurchaseData>,

    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl PurchaseResponse {
    pub fn success(success: PurchaseSuccess) -> Self {
        Self {
            data: Some(PurchaseData {
                purchase: Some(success),
            }),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<GraphqlError>) -> Self {
        Self { data: None, errors }
    }
}

/// Purchase submission backend
#[async_trait]
pub trait PurchaseApi: Send + Sync {
    /// Submit one purchase. HTTP 401 must come back as
    /// [`ApiError::Unauthorized`].
    async fn submit(&self, input: &PurchaseInput) -> Result<PurchaseResponse, ApiError>;
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'static str,
    variables: PurchaseVariables<'a>,
}

#[derive(Serialize)]
struct PurchaseVariables<'a> {
    input: &'a PurchaseInput,
}

/// reqwest-backed [`PurchaseApi`]
#[derive(Clone, Debug)]
pub struct GraphqlPurchaseApi {
    http: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl GraphqlPurchaseApi {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            bearer_token: None,
        }
    }

    /// Submit on behalf of a signed-in buyer
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

#[async_trait]
impl PurchaseApi for GraphqlPurchaseApi {
    async fn submit(&self, input: &PurchaseInput) -> Result<PurchaseResponse, ApiError> {
        let mut request = self.http.post(&self.endpoint).json(&GraphqlRequest {
            query: PURCHASE_MUTATION,
            variables: PurchaseVariables { input },
        });
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
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
