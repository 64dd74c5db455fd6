//! Per-tenant incremental order synchronisation.
//!
//! One worker per tenant ticks on a fixed period. Each tick obtains a bearer
//! token, resolves the revision cursor, fetches everything changed since the
//! cursor, ingests it in one transaction, advances the cursor and finally
//! publishes the batch. A stale cursor is reset from the upstream initial
//! revision and the fetch is retried at most once per tick.
//!
//! Failures are scoped to one tick of one tenant: they are logged and the
//! worker waits for its next tick. Only failing to list tenants at start is
//! fatal.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::ports::{
    BearerToken, OrderPublisher, OrderSource, RevisionBatch, TenantRepository,
};
use crate::domain::{
    CredentialCache, CursorStore, OrderIngestion, PersistedOrder, Revision, SyncError, Tenant,
    TenantId,
};

mod phase;
mod runtime;

pub use phase::{TickError, TickOutcome, TickPhase};
pub use runtime::{OrderSyncHandle, OrderSyncPorts};

/// Stale-cursor resets allowed within one tick.
const MAX_STALE_RECOVERIES: u32 = 1;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSyncConfig {
    /// Fixed period between two ticks of the same tenant.
    pub poll_interval: Duration,
}

impl Default for OrderSyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// Incremental fetch result together with how it was reached.
struct FetchedBatch {
    batch: RevisionBatch,
    requested: Revision,
    cursor_reset: bool,
}

/// Domain-owned order sync engine.
pub struct OrderSyncEngine {
    source: Arc<dyn OrderSource>,
    tenants: Arc<dyn TenantRepository>,
    publisher: Arc<dyn OrderPublisher>,
    credentials: CredentialCache,
    cursors: CursorStore,
    ingestion: OrderIngestion,
    config: OrderSyncConfig,
}

impl OrderSyncEngine {
    /// Build an engine over explicit ports.
    /// ```rust,ignore
    /// let engine = Arc::new(OrderSyncEngine::new(ports, OrderSyncConfig::default()));
    /// ```
    pub fn new(ports: OrderSyncPorts, config: OrderSyncConfig) -> Self {
        let OrderSyncPorts {
            source,
            tenants,
            revisions,
            orders,
            publisher,
        } = ports;

        Self {
            credentials: CredentialCache::new(Arc::clone(&source)),
            cursors: CursorStore::new(revisions),
            ingestion: OrderIngestion::new(orders),
            source,
            tenants,
            publisher,
            config,
        }
    }

    /// Per-tenant bearer token cache.
    pub fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    /// Per-tenant revision cursors.
    pub fn cursors(&self) -> &CursorStore {
        &self.cursors
    }

    /// Active configuration.
    pub fn config(&self) -> &OrderSyncConfig {
        &self.config
    }

    /// List tenants and spawn one worker per tenant.
    ///
    /// Returns as soon as every worker is spawned. Workers stop as soon as
    /// `cancel` fires, abandoning any tick in flight; tenants added after
    /// this call are not picked up.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] when tenants cannot be listed or none
    /// are configured.
    pub async fn start(
        self: Arc<Self>,
        cancel: CancellationToken,
    ) -> Result<OrderSyncHandle, SyncError> {
        let tenants = self
            .tenants
            .list_tenants()
            .await
            .map_err(|error| SyncError::config(format!("failed to list tenants: {error}")))?;
        if tenants.is_empty() {
            return Err(SyncError::config("no tenants configured for order sync"));
        }

        let workers = tenants
            .into_iter()
            .map(|tenant| tokio::spawn(Arc::clone(&self).run_worker(tenant, cancel.clone())))
            .collect::<Vec<_>>();
        info!(
            worker_count = workers.len(),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "order sync engine started"
        );
        Ok(OrderSyncHandle::new(workers, cancel))
    }

    /// Run exactly one tick for `tenant`.
    ///
    /// # Errors
    ///
    /// Returns a [`TickError`] naming the phase that failed. A failed tick
    /// never advances the cursor past data that was not ingested.
    pub async fn run_tick(&self, tenant: &Tenant) -> Result<TickOutcome, TickError> {
        let token = self
            .credentials
            .get_or_fetch(tenant)
            .await
            .map_err(TickError::at(TickPhase::Authenticating))?;
        let sub_organizations = self
            .source
            .list_sub_organizations(&token)
            .await
            .map_err(TickError::at(TickPhase::Authenticating))?;

        let cursor = self
            .resolve_cursor(tenant.id, &token, &sub_organizations)
            .await
            .map_err(TickError::at(TickPhase::CursorResolving))?;

        let FetchedBatch {
            batch,
            requested,
            cursor_reset,
        } = self
            .fetch_with_recovery(tenant.id, &token, &sub_organizations, cursor)
            .await
            .map_err(TickError::at(TickPhase::Fetching))?;

        let RevisionBatch {
            records,
            max_revision,
        } = batch;
        let orders = self
            .ingestion
            .ingest(tenant.id, records)
            .await
            .map_err(TickError::at(TickPhase::Ingesting))?;
        let revision = advance(requested, max_revision);
        self.cursors
            .set(tenant.id, revision)
            .await
            .map_err(TickError::at(TickPhase::Ingesting))?;

        let published = self.publish(tenant.id, &orders).await;

        Ok(TickOutcome {
            starting_revision: requested,
            revision,
            ingested: orders.len(),
            cursor_reset,
            published,
        })
    }

    async fn run_worker(self: Arc<Self>, tenant: Tenant, cancel: CancellationToken) {
        let period = self.config.poll_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let span = info_span!("tenant_tick", tenant_id = %tenant.id, tenant = %tenant.name);
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(tenant_id = %tenant.id, "order sync tick abandoned on cancellation");
                    break;
                }
                () = self.tick_and_log(&tenant).instrument(span) => {}
            }
        }

        debug!(tenant_id = %tenant.id, "order sync worker stopped");
    }

    async fn tick_and_log(&self, tenant: &Tenant) {
        match self.run_tick(tenant).await {
            Ok(outcome) => info!(
                ingested = outcome.ingested,
                revision = %outcome.revision,
                cursor_reset = outcome.cursor_reset,
                "order sync tick completed"
            ),
            Err(TickError { phase, error }) => warn!(
                phase = %phase,
                error = %error,
                "order sync tick failed"
            ),
        }
    }

    async fn resolve_cursor(
        &self,
        tenant_id: TenantId,
        token: &BearerToken,
        sub_organizations: &[String],
    ) -> Result<Revision, SyncError> {
        if let Some(revision) = self.cursors.get(tenant_id).await? {
            return Ok(revision);
        }

        let initial = self
            .source
            .fetch_initial_revision(token, sub_organizations)
            .await?;
        self.cursors.set(tenant_id, initial).await?;
        info!(revision = %initial, "bootstrapped order sync cursor");
        Ok(initial)
    }

    async fn fetch_with_recovery(
        &self,
        tenant_id: TenantId,
        token: &BearerToken,
        sub_organizations: &[String],
        cursor: Revision,
    ) -> Result<FetchedBatch, SyncError> {
        let mut requested = cursor;
        let mut recoveries = 0;

        loop {
            match self
                .source
                .fetch_since(token, sub_organizations, requested)
                .await
            {
                Ok(batch) => {
                    // A reset cursor is only stored once the upstream accepted it.
                    if recoveries > 0 {
                        self.cursors.set(tenant_id, requested).await?;
                    }
                    return Ok(FetchedBatch {
                        batch,
                        requested,
                        cursor_reset: recoveries > 0,
                    });
                }
                Err(error) if error.is_too_old_revision() && recoveries < MAX_STALE_RECOVERIES => {
                    recoveries += 1;
                    let reset = self
                        .source
                        .fetch_initial_revision(token, sub_organizations)
                        .await?;
                    info!(
                        stale_revision = %requested,
                        reset_revision = %reset,
                        "revision too old, retrying from upstream initial revision"
                    );
                    requested = reset;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    async fn publish(&self, tenant_id: TenantId, orders: &[PersistedOrder]) -> bool {
        match self.publisher.publish(tenant_id, orders).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    phase = %TickPhase::Publishing,
                    error = %error,
                    "order publish failed; ingested batch and cursor are kept"
                );
                false
            }
        }
    }
}

/// Next cursor after a successful fetch from `requested`.
///
/// The cursor never moves backwards outside a stale reset, even when the
/// upstream reports a lower watermark than the one requested.
fn advance(requested: Revision, max_revision: Revision) -> Revision {
    if max_revision < requested {
        warn!(
            requested = %requested,
            reported = %max_revision,
            "upstream reported a revision below the cursor; keeping the cursor"
        );
        return requested;
    }
    max_revision
}
