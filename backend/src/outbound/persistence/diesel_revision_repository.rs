//! PostgreSQL-backed revision watermark storage.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RevisionRepository, RevisionRepositoryError};
use crate::domain::{Revision, TenantId};

use super::diesel_helpers::{
    is_connection_error, map_diesel_error_message, map_pool_error_message,
};
use super::pool::{DbPool, PoolError};
use super::schema::order_revisions;

/// Diesel-backed implementation of the revision watermark port.
#[derive(Clone)]
pub struct DieselRevisionRepository {
    pool: DbPool,
}

impl DieselRevisionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RevisionRepositoryError {
    RevisionRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> RevisionRepositoryError {
    let lost_connection = is_connection_error(&error);
    let message = map_diesel_error_message(error, operation);
    if lost_connection {
        RevisionRepositoryError::connection(message)
    } else {
        RevisionRepositoryError::query(message)
    }
}

#[async_trait::async_trait]
impl RevisionRepository for DieselRevisionRepository {
    async fn find_revision(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<Revision>, RevisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let revision = order_revisions::table
            .filter(order_revisions::organization_id.eq(tenant_id.as_uuid()))
            .select(order_revisions::revision)
            .first::<i64>(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, "order revision lookup"))?;
        Ok(revision.map(Revision::new))
    }

    async fn save_revision(
        &self,
        tenant_id: TenantId,
        revision: Revision,
    ) -> Result<(), RevisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(order_revisions::table)
            .values((
                order_revisions::organization_id.eq(tenant_id.as_uuid()),
                order_revisions::revision.eq(revision.value()),
                order_revisions::updated_at.eq(diesel::dsl::now),
            ))
            .on_conflict(order_revisions::organization_id)
            .do_update()
            .set((
                order_revisions::revision.eq(excluded(order_revisions::revision)),
                order_revisions::updated_at.eq(excluded(order_revisions::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, "order revision upsert"))?;
        Ok(())
    }
}
