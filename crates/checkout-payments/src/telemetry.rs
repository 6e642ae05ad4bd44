//! Retry Telemetry
//!
//! One event per automatic re-submission. The transport behind the sink is
//! not this crate's concern.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryAttemptEvent {
    /// Purchase flow this retry belongs to
    pub flow_id: Uuid,

    /// 1 for the first automatic retry
    pub attempt: u32,

    pub error_code: String,

    /// Length of the payment nonce being resubmitted
    pub token_length: usize,

    pub network_online: bool,

    pub occurred_at: DateTime<Utc>,
}

pub trait RetryTelemetry: Send + Sync {
    fn record_retry(&self, event: &RetryAttemptEvent);

    /// Whether the client reports network connectivity
    fn network_online(&self) -> bool {
        true
    }
}

/// Emits retry events as structured log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRetryTelemetry;

impl RetryTelemetry for TracingRetryTelemetry {
    fn record_retry(&self, event: &RetryAttemptEvent) {
        tracing::info!(
            target: "checkout::telemetry",
            flow_id = %event.flow_id,
            attempt = event.attempt,
            error_code = %event.error_code,
            token_length = event.token_length,
            network_online = event.network_online,
            "purchase_retry_attempt"
        );
    }
}
