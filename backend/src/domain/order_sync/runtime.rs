//! Port bundle and running-engine handle for the order sync engine.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::domain::ports::{
    OrderPublisher, OrderRepository, OrderSource, RevisionRepository, TenantRepository,
};

/// Port bundle required by the order sync engine.
pub struct OrderSyncPorts {
    /// Upstream ordering API adapter.
    pub source: Arc<dyn OrderSource>,
    /// Tenant listing, read once at start.
    pub tenants: Arc<dyn TenantRepository>,
    /// Durable revision watermark storage.
    pub revisions: Arc<dyn RevisionRepository>,
    /// Transactional order storage.
    pub orders: Arc<dyn OrderRepository>,
    /// Best-effort downstream publisher.
    pub publisher: Arc<dyn OrderPublisher>,
}

impl OrderSyncPorts {
    /// Build a strongly-typed engine port bundle.
    pub fn new(
        source: Arc<dyn OrderSource>,
        tenants: Arc<dyn TenantRepository>,
        revisions: Arc<dyn RevisionRepository>,
        orders: Arc<dyn OrderRepository>,
        publisher: Arc<dyn OrderPublisher>,
    ) -> Self {
        Self {
            source,
            tenants,
            revisions,
            orders,
            publisher,
        }
    }
}

/// Handle over the spawned tenant workers.
///
/// Dropping the handle does not stop the workers; cancel the token passed to
/// [`super::OrderSyncEngine::start`] or call [`OrderSyncHandle::shutdown`].
#[derive(Debug)]
pub struct OrderSyncHandle {
    workers: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl OrderSyncHandle {
    pub(super) fn new(workers: Vec<JoinHandle<()>>, cancel: CancellationToken) -> Self {
        Self { workers, cancel }
    }

    /// Number of spawned tenant workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Signal every worker to stop, abandoning any tick in flight.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for every worker to exit.
    ///
    /// Workers only exit once cancelled, so call this after cancelling.
    pub async fn join(self) {
        for worker in self.workers {
            if let Err(error) = worker.await {
                warn!(error = %error, "order sync worker terminated abnormally");
            }
        }
    }

    /// Cancel and wait for every worker to exit.
    pub async fn shutdown(self) {
        self.cancel();
        self.join().await;
    }
}
