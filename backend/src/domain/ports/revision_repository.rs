//! Driven port for durable per-tenant revision watermarks.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Revision, TenantId};

define_port_error! {
    /// Errors raised while reading or writing revision watermarks.
    pub enum RevisionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "revision repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "revision repository query failed: {message}",
    }
}

/// Port for the persisted revision watermark, one row per tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevisionRepository: Send + Sync {
    /// Load the stored revision, or `None` when the tenant has never synced.
    async fn find_revision(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<Revision>, RevisionRepositoryError>;

    /// Store `revision` as the tenant's watermark, replacing any previous value.
    async fn save_revision(
        &self,
        tenant_id: TenantId,
        revision: Revision,
    ) -> Result<(), RevisionRepositoryError>;
}
