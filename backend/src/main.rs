//! Order sync entry-point: wires adapters into the engine and runs until
//! interrupted.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use order_sync::config::SyncSettings;
use order_sync::domain::{OrderSyncConfig, OrderSyncEngine, OrderSyncPorts};
use order_sync::outbound::iiko::IikoHttpClient;
use order_sync::outbound::persistence::{
    DbPool, DieselOrderRepository, DieselRevisionRepository, DieselTenantRepository,
};
use order_sync::outbound::publish::TracingOrderPublisher;

/// Application bootstrap.
#[tokio::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = SyncSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let engine = Arc::new(build_engine(&settings).await?);

    let cancel = CancellationToken::new();
    let handle = engine
        .start(cancel.clone())
        .await
        .map_err(|error| io::Error::other(format!("start order sync: {error}")))?;

    tokio::signal::ctrl_c().await?;
    info!(
        worker_count = handle.worker_count(),
        "shutdown requested; stopping order sync workers"
    );
    handle.shutdown().await;
    Ok(())
}

async fn build_engine(settings: &SyncSettings) -> io::Result<OrderSyncEngine> {
    let pool_config = settings.pool_config().map_err(io::Error::other)?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let source = IikoHttpClient::new(
        settings.iiko_base_url().map_err(io::Error::other)?,
        settings.request_timeout().map_err(io::Error::other)?,
        Arc::new(DefaultClock),
    )
    .map_err(|error| io::Error::other(format!("create upstream client: {error}")))?
    .with_initial_window(settings.initial_window().map_err(io::Error::other)?);

    let ports = OrderSyncPorts::new(
        Arc::new(source),
        Arc::new(DieselTenantRepository::new(pool.clone())),
        Arc::new(DieselRevisionRepository::new(pool.clone())),
        Arc::new(DieselOrderRepository::new(pool)),
        Arc::new(TracingOrderPublisher),
    );
    let config = OrderSyncConfig {
        poll_interval: settings.poll_interval().map_err(io::Error::other)?,
    };
    Ok(OrderSyncEngine::new(ports, config))
}
