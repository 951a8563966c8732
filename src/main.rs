use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use order_settlement::adapters::{build_app, InMemoryOrderStore, PaystackClient, PaystackConfig};
use order_settlement::adapters::http::SettlementAppState;
use order_settlement::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    init_tracing(&config);

    config.validate()?;

    let paystack = PaystackConfig::from_payment_config(&config.payment).ok_or_else(|| {
        let mode = if config.payment.test_mode { "test" } else { "live" };
        format!("payment.{}_secret_key is not set", mode)
    })?;

    if !config.payment.is_available() {
        tracing::warn!(
            currency = %config.payment.store_currency,
            "Paystack is not available for new payments; settling existing references only"
        );
    }

    // Orders live in the storefront; the in-memory store stands in for it here.
    let order_store = Arc::new(InMemoryOrderStore::new());
    tracing::warn!("Using the in-memory order store; it starts empty and nothing settles until orders are inserted");
    let payment_provider = Arc::new(PaystackClient::new(paystack));

    let state = SettlementAppState::new(
        order_store,
        payment_provider,
        config.payment.clone(),
        config.storefront.clone(),
    );

    let app = build_app(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        test_mode = config.payment.test_mode,
        "Order settlement listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.clone().into());
    let json = config.is_production();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
