//! Purchase Orchestrator
//!
//! Submits a purchase, classifies the answer and, when the server flags the
//! failure as retryable, re-submits the identical input once.
//!
//! ```text
//! submit ──▶ 401 ───────────────────────────▶ Authorization
//!    │──▶ transport / non-2xx ──────────────▶ Integration
//!    │──▶ errors ──▶ retryable & enabled & budget left ──▶ submit again
//!    │                 └── otherwise ───────▶ Payment { code, message }
//!    │──▶ no errors, no payload ────────────▶ Integration ("invalid response")
//!    └──▶ payload ──────────────────────────▶ Ok(PurchaseSuccess)
//! ```
//!
//! The same payment nonce goes out on the retry. Deduplicating a resubmitted
//! charge is the purchase API's job.

use std::sync::Arc;

use checkout_core::retry::MAX_AUTOMATIC_RETRIES;
use checkout_core::{CheckoutError, RetryPolicy};
use chrono::Utc;
use uuid::Uuid;

use crate::api::{GraphqlError, PurchaseApi, PurchaseResponse};
use crate::error::Result;
use crate::purchase::{PurchaseInput, PurchaseSuccess};
use crate::telemetry::{RetryAttemptEvent, RetryTelemetry};

/// Error code used when the server supplies none
const UNKNOWN_ERROR_CODE: &str = "UNKNOWN";

enum Classified {
    Success(PurchaseSuccess),
    Rejected {
        error: CheckoutError,
        code: String,
        retryable: bool,
    },
}

fn classify(response: PurchaseResponse) -> Result<Classified> {
    if !response.errors.is_empty() {
        return Ok(rejection(&response.errors));
    }

    match response.data.and_then(|data| data.purchase) {
        Some(success) => Ok(Classified::Success(success)),
        None => Err(CheckoutError::integration("invalid response")),
    }
}

fn rejection(errors: &[GraphqlError]) -> Classified {
    let retryable = errors.iter().any(GraphqlError::is_retryable);
    let code = errors
        .iter()
        .find_map(GraphqlError::code)
        .unwrap_or(UNKNOWN_ERROR_CODE)
        .to_string();
    let message = errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_default();

    Classified::Rejected {
        error: CheckoutError::payment(code.clone(), message),
        code,
        retryable,
    }
}

/// Drives one purchase submission with the single automatic retry
pub struct PurchaseOrchestrator {
    api: Arc<dyn PurchaseApi>,
    telemetry: Arc<dyn RetryTelemetry>,
    retry_enabled: bool,
}

impl PurchaseOrchestrator {
    pub fn new(api: Arc<dyn PurchaseApi>, telemetry: Arc<dyn RetryTelemetry>) -> Self {
        Self {
            api,
            telemetry,
            retry_enabled: true,
        }
    }

    #[must_use]
    pub const fn with_retry_enabled(mut self, enabled: bool) -> Self {
        self.retry_enabled = enabled;
        self
    }

    /// Submit `input`. `policy` belongs to the caller's purchase flow and is
    /// not reset here.
    pub async fn purchase(
        &self,
        input: &PurchaseInput,
        policy: &mut RetryPolicy,
    ) -> Result<PurchaseSuccess> {
        let flow_id = Uuid::new_v4();
        let mut last_error = None;

        for submission in 0..=MAX_AUTOMATIC_RETRIES {
            tracing::debug!(%flow_id, submission, "Submitting purchase");

            let response = self.api.submit(input).await.map_err(|e| {
                tracing::error!(%flow_id, error = %e, "Purchase submission failed");
                CheckoutError::from(e)
            })?;

            match classify(response)? {
                Classified::Success(success) => {
                    tracing::info!(
                        %flow_id,
                        payment_id = %success.payment_id,
                        retried = submission > 0,
                        "Purchase completed"
                    );
                    return Ok(success);
                }
                Classified::Rejected {
                    error,
                    code,
                    retryable,
                } => {
                    if !(self.retry_enabled && retryable && policy.can_retry()) {
                        tracing::warn!(%flow_id, error_code = %code, retryable, "Purchase rejected");
                        return Err(error);
                    }

                    self.telemetry.record_retry(&RetryAttemptEvent {
                        flow_id,
                        attempt: policy.attempts() + 1,
                        error_code: code,
                        token_length: input.payment.nonce.len(),
                        network_online: self.telemetry.network_online(),
                        occurred_at: Utc::now(),
                    });
                    policy.increment();
                    last_error = Some(error);
                }
            }
        }

        // Unreachable while the policy budget matches the loop bound.
        Err(last_error.unwrap_or_else(|| CheckoutError::integration("retry budget exceeded")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorExtensions;
    use crate::error::ApiError;
    use crate::purchase::{CheckoutSubmission, ItemReference, TrackingInput};
    use crate::testing::{RecordingTelemetry, ScriptedPurchaseApi};

    fn input() -> PurchaseInput {
        CheckoutSubmission {
            item: Some(ItemReference::Offer("offer_10h".into())),
            currency: "USD".into(),
            nonce: "tok_1234567890".into(),
            ..CheckoutSubmission::default()
        }
        .into_input(TrackingInput::default())
    }

    fn success(payment_id: &str) -> PurchaseResponse {
        PurchaseResponse::success(PurchaseSuccess {
            destination_path: "/welcome".into(),
            account_tokens: None,
            payment_id: payment_id.into(),
        })
    }

    fn error(code: &str, retryable: bool) -> PurchaseResponse {
        PurchaseResponse::failure(vec![GraphqlError {
            message: format!("{code} happened"),
            extensions: Some(ErrorExtensions {
                code: Some(code.into()),
                is_retryable: Some(retryable),
            }),
        }])
    }

    fn orchestrator(
        responses: Vec<std::result::Result<PurchaseResponse, ApiError>>,
    ) -> (PurchaseOrchestrator, Arc<ScriptedPurchaseApi>, Arc<RecordingTelemetry>) {
        let api = Arc::new(ScriptedPurchaseApi::new(responses));
        let telemetry = Arc::new(RecordingTelemetry::default());
        let orchestrator = PurchaseOrchestrator::new(api.clone(), telemetry.clone());
        (orchestrator, api, telemetry)
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let (orchestrator, api, telemetry) = orchestrator(vec![Ok(success("pay_1"))]);
        let mut policy = RetryPolicy::new();

        let result = orchestrator.purchase(&input(), &mut policy).await.unwrap();

        assert_eq!(result.payment_id, "pay_1");
        assert_eq!(api.submission_count(), 1);
        assert!(telemetry.events.lock().unwrap().is_empty());
        assert!(policy.can_retry());
    }

    #[tokio::test]
    async fn test_retryable_error_resubmits_identical_input_once() {
        let (orchestrator, api, telemetry) = orchestrator(vec![
            Ok(error("PROCESSOR_TIMEOUT", true)),
            Ok(success("pay_2")),
        ]);
        let mut policy = RetryPolicy::new();
        let input = input();

        let result = orchestrator.purchase(&input, &mut policy).await.unwrap();

        assert_eq!(result.payment_id, "pay_2");
        let submissions = api.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[0], input);
        assert_eq!(submissions[1], input);
        assert!(!policy.can_retry());

        let events = telemetry.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].attempt, 1);
        assert_eq!(events[0].error_code, "PROCESSOR_TIMEOUT");
        assert_eq!(events[0].token_length, "tok_1234567890".len());
        assert!(events[0].network_online);
    }

    #[tokio::test]
    async fn test_second_retryable_error_is_not_retried() {
        let (orchestrator, api, _) = orchestrator(vec![
            Ok(error("PROCESSOR_TIMEOUT", true)),
            Ok(error("PROCESSOR_TIMEOUT", true)),
        ]);
        let mut policy = RetryPolicy::new();

        let err = orchestrator.purchase(&input(), &mut policy).await.unwrap_err();

        assert_eq!(api.submission_count(), 2);
        assert_eq!(
            err,
            CheckoutError::payment("PROCESSOR_TIMEOUT", "PROCESSOR_TIMEOUT happened")
        );
    }

    #[tokio::test]
    async fn test_exhausted_policy_is_not_retried() {
        let (orchestrator, api, telemetry) = orchestrator(vec![Ok(error("PROCESSOR_TIMEOUT", true))]);
        let mut policy = RetryPolicy::new();
        policy.increment();

        let err = orchestrator.purchase(&input(), &mut policy).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Payment { .. }));
        assert_eq!(api.submission_count(), 1);
        assert!(telemetry.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_disabled() {
        let (orchestrator, api, _) = orchestrator(vec![Ok(error("PROCESSOR_TIMEOUT", true))]);
        let orchestrator = orchestrator.with_retry_enabled(false);

        let err = orchestrator
            .purchase(&input(), &mut RetryPolicy::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Payment { .. }));
        assert_eq!(api.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_non_retryable_error_keeps_server_code() {
        let (orchestrator, api, _) = orchestrator(vec![Ok(error("CARD_DECLINED", false))]);

        let err = orchestrator
            .purchase(&input(), &mut RetryPolicy::new())
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::payment("CARD_DECLINED", "CARD_DECLINED happened"));
        assert_eq!(api.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_any_retryable_entry_triggers_retry() {
        let mixed = PurchaseResponse::failure(vec![
            GraphqlError {
                message: "Validation".into(),
                extensions: None,
            },
            GraphqlError {
                message: "Gateway busy".into(),
                extensions: Some(ErrorExtensions {
                    code: Some("GATEWAY_BUSY".into()),
                    is_retryable: Some(true),
                }),
            },
        ]);
        let (orchestrator, api, _) = orchestrator(vec![Ok(mixed), Ok(success("pay_3"))]);

        let result = orchestrator.purchase(&input(), &mut RetryPolicy::new()).await;

        assert!(result.is_ok());
        assert_eq!(api.submission_count(), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_is_never_retried() {
        let (orchestrator, api, telemetry) = orchestrator(vec![Err(ApiError::Unauthorized)]);
        let mut policy = RetryPolicy::new();

        let err = orchestrator.purchase(&input(), &mut policy).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Authorization(_)));
        assert_eq!(api.submission_count(), 1);
        assert!(telemetry.events.lock().unwrap().is_empty());
        assert!(policy.can_retry());
    }

    #[tokio::test]
    async fn test_http_error_is_integration_failure() {
        let (orchestrator, _, _) = orchestrator(vec![Err(ApiError::Http {
            status: 502,
            body: "bad gateway".into(),
        })]);

        let err = orchestrator
            .purchase(&input(), &mut RetryPolicy::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Integration { .. }));
    }

    #[tokio::test]
    async fn test_empty_response_is_invalid() {
        let (orchestrator, _, _) = orchestrator(vec![Ok(PurchaseResponse::default())]);

        let err = orchestrator
            .purchase(&input(), &mut RetryPolicy::new())
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::integration("invalid response"));
    }
}
