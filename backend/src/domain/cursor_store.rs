//! Durable per-tenant revision watermark with an in-memory read-through cache.
//!
//! The persisted value is the source of truth: [`CursorStore::set`] writes
//! storage first and only then updates memory, so a failed write never leaves
//! the cache ahead of storage. Each tenant is written by its own worker only;
//! the sharded map keeps tenants from blocking each other and lets
//! diagnostics read a consistent value per tenant.

use std::sync::Arc;

use dashmap::DashMap;

use super::ports::RevisionRepository;
use super::{Revision, SyncError, TenantId};

/// Read-through cache over a [`RevisionRepository`].
pub struct CursorStore {
    repository: Arc<dyn RevisionRepository>,
    cache: DashMap<TenantId, Revision>,
}

impl CursorStore {
    /// Build an empty store backed by `repository`.
    pub fn new(repository: Arc<dyn RevisionRepository>) -> Self {
        Self {
            repository,
            cache: DashMap::new(),
        }
    }

    /// Return the tenant's revision, loading it from storage on a cache miss.
    ///
    /// `Ok(None)` means the tenant has no cursor yet and must be bootstrapped
    /// from the upstream initial revision.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Storage`] when storage cannot be read.
    pub async fn get(&self, tenant_id: TenantId) -> Result<Option<Revision>, SyncError> {
        if let Some(revision) = self.cached(tenant_id) {
            return Ok(Some(revision));
        }

        let stored = self.repository.find_revision(tenant_id).await?;
        if let Some(revision) = stored {
            self.cache.insert(tenant_id, revision);
        }
        Ok(stored)
    }

    /// Persist `revision` and then mirror it in memory.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Storage`] when the write fails; the cached value
    /// is left untouched in that case.
    pub async fn set(&self, tenant_id: TenantId, revision: Revision) -> Result<(), SyncError> {
        self.repository.save_revision(tenant_id, revision).await?;
        self.cache.insert(tenant_id, revision);
        Ok(())
    }

    /// Cached revision without touching storage.
    pub fn cached(&self, tenant_id: TenantId) -> Option<Revision> {
        self.cache.get(&tenant_id).map(|entry| *entry.value())
    }

    /// Snapshot of every cached revision, ordered by tenant.
    pub fn snapshot(&self) -> Vec<(TenantId, Revision)> {
        let mut entries = self
            .cache
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect::<Vec<_>>();
        entries.sort_unstable_by_key(|(tenant_id, _)| *tenant_id);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockRevisionRepository, RevisionRepositoryError};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn tenant_id() -> TenantId {
        TenantId::new(Uuid::new_v4())
    }

    #[rstest]
    #[tokio::test]
    async fn loads_from_storage_once_then_serves_from_memory(tenant_id: TenantId) {
        let mut repository = MockRevisionRepository::new();
        repository
            .expect_find_revision()
            .with(eq(tenant_id))
            .times(1)
            .returning(|_| Ok(Some(Revision::new(50))));
        let store = CursorStore::new(Arc::new(repository));

        assert_eq!(store.get(tenant_id).await.expect("get"), Some(Revision::new(50)));
        assert_eq!(store.get(tenant_id).await.expect("get"), Some(Revision::new(50)));
        assert_eq!(store.cached(tenant_id), Some(Revision::new(50)));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_row_signals_no_cursor_and_is_not_cached(tenant_id: TenantId) {
        let mut repository = MockRevisionRepository::new();
        repository
            .expect_find_revision()
            .times(2)
            .returning(|_| Ok(None));
        let store = CursorStore::new(Arc::new(repository));

        assert_eq!(store.get(tenant_id).await.expect("get"), None);
        assert_eq!(store.get(tenant_id).await.expect("get"), None);
        assert!(store.snapshot().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn set_is_visible_to_the_next_get(tenant_id: TenantId) {
        let mut repository = MockRevisionRepository::new();
        repository
            .expect_save_revision()
            .with(eq(tenant_id), eq(Revision::new(105)))
            .times(1)
            .returning(|_, _| Ok(()));
        repository.expect_find_revision().never();
        let store = CursorStore::new(Arc::new(repository));

        store.set(tenant_id, Revision::new(105)).await.expect("set");

        assert_eq!(store.get(tenant_id).await.expect("get"), Some(Revision::new(105)));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_write_leaves_cache_untouched(tenant_id: TenantId) {
        let mut repository = MockRevisionRepository::new();
        repository
            .expect_find_revision()
            .returning(|_| Ok(Some(Revision::new(50))));
        repository
            .expect_save_revision()
            .returning(|_, _| Err(RevisionRepositoryError::connection("pool closed")));
        let store = CursorStore::new(Arc::new(repository));
        store.get(tenant_id).await.expect("warm cache");

        let err = store
            .set(tenant_id, Revision::new(60))
            .await
            .expect_err("write fails");

        assert!(matches!(err, SyncError::Storage { .. }));
        assert_eq!(store.cached(tenant_id), Some(Revision::new(50)));
    }

    #[tokio::test]
    async fn snapshot_lists_every_cached_tenant_in_order() {
        let mut repository = MockRevisionRepository::new();
        repository.expect_save_revision().returning(|_, _| Ok(()));
        let store = CursorStore::new(Arc::new(repository));
        let low = TenantId::new(Uuid::from_u128(1));
        let high = TenantId::new(Uuid::from_u128(2));

        store.set(high, Revision::new(7)).await.expect("set high");
        store.set(low, Revision::new(3)).await.expect("set low");

        assert_eq!(
            store.snapshot(),
            vec![(low, Revision::new(3)), (high, Revision::new(7))]
        );
    }
}
