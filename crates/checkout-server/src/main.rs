//! Checkout HTTP Server
//!
//! Axum-based server exposing the checkout API used by the web client:
//! reconciled offer pricing and purchase submission.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_payments::{CheckoutConfig, HttpCheckoutBackend, TracingRetryTelemetry};

use crate::handlers::{get_checkout, health_check, submit_purchase};
use crate::state::AppState;

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/checkout/{offer_id}", get(get_checkout))
        .route("/api/purchase", post(submit_purchase))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before reading RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CheckoutConfig::from_env()?;
    let http = config.http_client()?;

    let backend = HttpCheckoutBackend::new(
        http.clone(),
        config.api_url.clone(),
        config.package_type_ids.clone(),
    );

    tracing::info!(
        graphql_url = %config.graphql_url,
        api_url = %config.api_url,
        retry_enabled = config.retry_enabled,
        "Checkout configured"
    );

    let state = AppState {
        config: Arc::new(config),
        http,
        backend: Arc::new(backend),
        telemetry: Arc::new(TracingRetryTelemetry),
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("checkout-server running on http://{}", addr);
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/checkout/{{offer_id}}?quote_id=&alternatives=");
    tracing::info!("  POST /api/purchase");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
