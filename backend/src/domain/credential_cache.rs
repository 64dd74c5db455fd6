//! Per-tenant bearer token cache.
//!
//! Tokens are fetched lazily on first use and then reused for the lifetime of
//! the process. There is no expiry tracking: a revoked token only shows up as
//! a failing upstream call. [`CredentialCache::invalidate`] is the hook for a
//! re-authentication policy; the engine does not call it.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::ports::{BearerToken, OrderSource};
use super::{SyncError, Tenant, TenantId};

/// Tenant to bearer token map, sharded so tenants never contend with each other.
pub struct CredentialCache {
    source: Arc<dyn OrderSource>,
    tokens: DashMap<TenantId, BearerToken>,
}

impl CredentialCache {
    /// Build an empty cache that authenticates through `source`.
    pub fn new(source: Arc<dyn OrderSource>) -> Self {
        Self {
            source,
            tokens: DashMap::new(),
        }
    }

    /// Return the cached token for `tenant`, authenticating on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Auth`] when the upstream rejects the credential
    /// and [`SyncError::Transient`] for other upstream failures. Nothing is
    /// cached on failure.
    pub async fn get_or_fetch(&self, tenant: &Tenant) -> Result<BearerToken, SyncError> {
        let cached = self
            .tokens
            .get(&tenant.id)
            .map(|entry| entry.value().clone());
        if let Some(token) = cached {
            return Ok(token);
        }

        let token = self
            .source
            .authenticate(&tenant.api_login)
            .await
            .map_err(SyncError::from)?;
        debug!(tenant_id = %tenant.id, "cached new upstream bearer token");
        self.tokens.insert(tenant.id, token.clone());
        Ok(token)
    }

    /// Drop the cached token so the next call re-authenticates.
    ///
    /// Returns whether a token was cached.
    pub fn invalidate(&self, tenant_id: TenantId) -> bool {
        self.tokens.remove(&tenant_id).is_some()
    }

    /// Whether a token is cached for `tenant_id`.
    pub fn contains(&self, tenant_id: TenantId) -> bool {
        self.tokens.contains_key(&tenant_id)
    }
}
