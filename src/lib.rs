//! Lambda collector library
//!
//! Receiver plugins registered with the collector kernel, plus the bootstrap
//! that wires them into the configured pipelines.

use std::sync::Arc;

use anyhow::Context;
use collector_kernel::settings::Settings;
use collector_kernel::{FactoryRegistry, HostCtx, LoggingConsumer, Service};

pub mod receivers;

/// Registry holding every receiver factory linked into this crate
pub fn factory_registry(settings: &Settings) -> anyhow::Result<FactoryRegistry> {
    FactoryRegistry::from_inventory(settings).context("failed to register receiver factories")
}

/// Build receivers for the configured pipelines, sending data to logging sinks
pub fn build_service(settings: &Settings) -> anyhow::Result<Service> {
    let registry = factory_registry(settings)?;
    Service::build(
        &registry,
        &settings.pipelines,
        Arc::new(LoggingConsumer::new("traces")),
        Arc::new(LoggingConsumer::new("logs")),
    )
    .context("failed to build pipelines")
}

/// Run the collector until ctrl-c, then shut every receiver down
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let service = build_service(&settings)?;
    let ctx = HostCtx {
        settings: &settings,
    };

    service.start(&ctx).await?;
    tracing::info!(receivers = service.receiver_count(), "collector running");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("shutdown signal received");
    service.shutdown().await
}
