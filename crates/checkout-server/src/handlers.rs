//! HTTP Handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
};
use serde::{Deserialize, Serialize};

use checkout_core::{CheckoutError, ReconciledCheckout, RetryPolicy};
use checkout_payments::{
    CheckoutSubmission, GraphqlPurchaseApi, PurchaseOrchestrator, PurchaseSuccess, TrackingInput,
    load_checkout,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub retry_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    #[serde(default)]
    pub quote_id: Option<String>,

    /// Comma-separated alternative offer ids
    #[serde(default)]
    pub alternatives: Option<String>,
}

impl CheckoutQuery {
    fn alternative_ids(&self) -> Vec<String> {
        self.alternatives
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(flatten)]
    pub submission: CheckoutSubmission,

    /// Page URL the buyer checked out from
    #[serde(default)]
    pub checkout_url: Option<String>,
}

// ============================================================================
// Error Mapping
// ============================================================================

pub fn error_response(err: &CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        CheckoutError::Authorization(_) => StatusCode::UNAUTHORIZED,
        CheckoutError::Payment { .. } => StatusCode::PAYMENT_REQUIRED,
        CheckoutError::InvalidQuote(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CheckoutError::Integration { .. } => StatusCode::BAD_GATEWAY,
        CheckoutError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let code = match err {
        CheckoutError::Payment { code, .. } => code.clone(),
        other => other.code().to_string(),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code,
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        retry_enabled: state.config.retry_enabled,
    })
}

/// Reconciled prices for the selected offer and its alternatives
pub async fn get_checkout(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
    Query(query): Query<CheckoutQuery>,
) -> ApiResult<ReconciledCheckout> {
    let alternatives = query.alternative_ids();

    load_checkout(
        state.backend.as_ref(),
        &offer_id,
        &alternatives,
        query.quote_id.as_deref(),
    )
    .await
    .map(Json)
    .map_err(|e| {
        tracing::error!(offer_id = %offer_id, error = %e, "Failed to load checkout");
        error_response(&e)
    })
}

/// Submit a purchase, with the single automatic retry
pub async fn submit_purchase(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PurchaseRequest>,
) -> ApiResult<PurchaseSuccess> {
    let mut tracking = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(TrackingInput::from_cookie_header)
        .unwrap_or_default();
    if let Some(url) = payload.checkout_url.as_deref() {
        tracking = tracking.with_enrollment_from_url(url);
    }

    let mut api = GraphqlPurchaseApi::new(state.http.clone(), state.config.graphql_url.clone());
    if let Some(token) = bearer_token(&headers) {
        api = api.with_bearer(token);
    }

    let orchestrator = PurchaseOrchestrator::new(Arc::new(api), Arc::clone(&state.telemetry))
        .with_retry_enabled(state.config.retry_enabled);

    let input = payload.submission.into_input(tracking);
    let mut policy = RetryPolicy::new();

    orchestrator
        .purchase(&input, &mut policy)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}
