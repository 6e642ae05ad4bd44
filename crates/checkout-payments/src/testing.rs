//! Test doubles for the processor SDK, the purchase API and telemetry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{PurchaseApi, PurchaseResponse};
use crate::error::{ApiError, SdkError};
use crate::purchase::PurchaseInput;
use crate::sdk::{
    ClientHandle, CollectorHandle, DeviceCollector, GooglePayEnvironment, GooglePaymentsClient,
    GooglePaymentsClientHandle, IsReadyToPayRequest, MethodHandle, PaymentClient, PaymentMethod,
    PaymentMethodKind, ProcessorSdk,
};
use crate::telemetry::{RetryAttemptEvent, RetryTelemetry};

#[derive(Debug)]
pub struct MockClient {
    id: String,
}

impl PaymentClient for MockClient {
    fn client_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
pub struct MockCollector {
    teardowns: Arc<AtomicUsize>,
}

#[async_trait]
impl DeviceCollector for MockCollector {
    fn device_data(&self) -> &str {
        r#"{"correlation_id":"mock-device"}"#
    }

    async fn teardown(&self) -> Result<(), SdkError> {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockMethod(pub PaymentMethodKind);

impl PaymentMethod for MockMethod {
    fn kind(&self) -> PaymentMethodKind {
        self.0
    }
}

#[derive(Debug)]
pub struct MockPaymentsClient {
    ready: bool,
}

#[async_trait]
impl GooglePaymentsClient for MockPaymentsClient {
    async fn is_ready_to_pay(&self, _request: &IsReadyToPayRequest) -> Result<bool, SdkError> {
        Ok(self.ready)
    }
}

/// Scriptable SDK with call counters
#[derive(Debug, Default)]
pub struct MockProcessorSdk {
    pub script_loads: AtomicUsize,
    pub client_creations: AtomicUsize,
    pub collector_creations: AtomicUsize,
    pub collector_teardowns: Arc<AtomicUsize>,
    pub google_pay_probes: AtomicUsize,

    script_loaded: AtomicBool,
    load_delay_ms: u64,
    fail_script_load: bool,
    client_failures_left: AtomicUsize,
    collector_delay_ms: u64,
    collector_failures_left: AtomicUsize,
    fail_hosted_fields: bool,
    apple_pay_supported: bool,
    /// Probes before the wallet global appears; `None` never appears
    google_pay_global_after: Option<usize>,
    google_pay_ready: bool,
    paypal_global: bool,
    fail_paypal: bool,
}

impl MockProcessorSdk {
    /// Everything available and working
    pub fn new() -> Self {
        Self {
            apple_pay_supported: true,
            google_pay_global_after: Some(0),
            google_pay_ready: true,
            paypal_global: true,
            ..Self::default()
        }
    }

    pub const fn with_load_delay_ms(mut self, ms: u64) -> Self {
        self.load_delay_ms = ms;
        self
    }

    pub fn with_script_loaded(self) -> Self {
        self.script_loaded.store(true, Ordering::SeqCst);
        self
    }

    pub const fn failing_script_load(mut self) -> Self {
        self.fail_script_load = true;
        self
    }

    pub fn failing_client_creations(self, count: usize) -> Self {
        self.client_failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub const fn with_collector_delay_ms(mut self, ms: u64) -> Self {
        self.collector_delay_ms = ms;
        self
    }

    pub fn failing_collector_creations(self, count: usize) -> Self {
        self.collector_failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub const fn failing_hosted_fields(mut self) -> Self {
        self.fail_hosted_fields = true;
        self
    }

    pub const fn without_apple_pay(mut self) -> Self {
        self.apple_pay_supported = false;
        self
    }

    pub const fn google_pay_global_after(mut self, probes: Option<usize>) -> Self {
        self.google_pay_global_after = probes;
        self
    }

    pub const fn google_pay_not_ready(mut self) -> Self {
        self.google_pay_ready = false;
        self
    }

    pub const fn without_paypal_global(mut self) -> Self {
        self.paypal_global = false;
        self
    }

    pub const fn failing_paypal(mut self) -> Self {
        self.fail_paypal = true;
        self
    }
}

#[async_trait]
impl ProcessorSdk for MockProcessorSdk {
    fn is_script_loaded(&self) -> bool {
        self.script_loaded.load(Ordering::SeqCst)
    }

    async fn load_script(&self) -> Result<(), SdkError> {
        self.script_loads.fetch_add(1, Ordering::SeqCst);
        if self.load_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.load_delay_ms)).await;
        }
        if self.fail_script_load {
            return Err(SdkError::ScriptLoad("network error".into()));
        }
        self.script_loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_client(&self, _authorization: &str) -> Result<ClientHandle, SdkError> {
        let n = self.client_creations.fetch_add(1, Ordering::SeqCst);
        let failures_left = self.client_failures_left.load(Ordering::SeqCst);
        if failures_left > 0 {
            self.client_failures_left.store(failures_left - 1, Ordering::SeqCst);
            return Err(SdkError::Construction("invalid authorization".into()));
        }
        Ok(Arc::new(MockClient {
            id: format!("client_{n}"),
        }))
    }

    async fn create_data_collector(&self, _client: &ClientHandle) -> Result<CollectorHandle, SdkError> {
        self.collector_creations.fetch_add(1, Ordering::SeqCst);
        if self.collector_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.collector_delay_ms)).await;
        }
        let failures_left = self.collector_failures_left.load(Ordering::SeqCst);
        if failures_left > 0 {
            self.collector_failures_left.store(failures_left - 1, Ordering::SeqCst);
            return Err(SdkError::Construction("collector blocked".into()));
        }
        Ok(Arc::new(MockCollector {
            teardowns: Arc::clone(&self.collector_teardowns),
        }))
    }

    async fn create_hosted_fields(&self, _client: &ClientHandle) -> Result<MethodHandle, SdkError> {
        if self.fail_hosted_fields {
            return Err(SdkError::Construction("hosted fields iframe failed".into()));
        }
        Ok(Arc::new(MockMethod(PaymentMethodKind::Card)))
    }

    async fn create_apple_pay(&self, _client: &ClientHandle) -> Result<MethodHandle, SdkError> {
        if !self.apple_pay_supported {
            return Err(SdkError::Unsupported("Apple Pay is not available".into()));
        }
        Ok(Arc::new(MockMethod(PaymentMethodKind::ApplePay)))
    }

    fn google_pay_global_available(&self) -> bool {
        let probes = self.google_pay_probes.fetch_add(1, Ordering::SeqCst);
        self.google_pay_global_after.is_some_and(|after| probes >= after)
    }

    async fn create_google_payments_client(
        &self,
        _environment: GooglePayEnvironment,
    ) -> Result<GooglePaymentsClientHandle, SdkError> {
        Ok(Arc::new(MockPaymentsClient {
            ready: self.google_pay_ready,
        }))
    }

    async fn create_google_payment(
        &self,
        _client: &ClientHandle,
        _environment: GooglePayEnvironment,
    ) -> Result<MethodHandle, SdkError> {
        Ok(Arc::new(MockMethod(PaymentMethodKind::GooglePay)))
    }

    fn paypal_global_available(&self) -> bool {
        self.paypal_global
    }

    async fn create_paypal_checkout(&self, _client: &ClientHandle) -> Result<MethodHandle, SdkError> {
        if self.fail_paypal {
            return Err(SdkError::Construction("paypal checkout rejected".into()));
        }
        Ok(Arc::new(MockMethod(PaymentMethodKind::Paypal)))
    }
}

/// Purchase API answering from a queue of canned responses
#[derive(Default)]
pub struct ScriptedPurchaseApi {
    responses: Mutex<VecDeque<Result<PurchaseResponse, ApiError>>>,
    pub submissions: Mutex<Vec<PurchaseInput>>,
}

impl ScriptedPurchaseApi {
    pub fn new(responses: Vec<Result<PurchaseResponse, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl PurchaseApi for ScriptedPurchaseApi {
    async fn submit(&self, input: &PurchaseInput) -> Result<PurchaseResponse, ApiError> {
        self.submissions.lock().unwrap().push(input.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected purchase submission")
    }
}

/// Subscriber counting WARN and ERROR events, for `tracing::subscriber::set_default`
#[derive(Clone, Debug, Default)]
pub struct WarningCounter {
    pub warnings: Arc<AtomicUsize>,
}

impl tracing::Subscriber for WarningCounter {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        if *event.metadata().level() <= tracing::Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}
}

/// Telemetry sink keeping every event
#[derive(Default)]
pub struct RecordingTelemetry {
    pub events: Mutex<Vec<RetryAttemptEvent>>,
}

impl RetryTelemetry for RecordingTelemetry {
    fn record_retry(&self, event: &RetryAttemptEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
