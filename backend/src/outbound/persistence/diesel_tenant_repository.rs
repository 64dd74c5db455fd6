//! PostgreSQL-backed tenant listing.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TenantRepository, TenantRepositoryError};
use crate::domain::{ApiLogin, Tenant, TenantId};

use super::diesel_helpers::{
    is_connection_error, map_diesel_error_message, map_pool_error_message,
};
use super::pool::{DbPool, PoolError};
use super::schema::organizations;

/// Diesel-backed implementation of the tenant listing port.
#[derive(Clone)]
pub struct DieselTenantRepository {
    pool: DbPool,
}

impl DieselTenantRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TenantRepositoryError {
    TenantRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> TenantRepositoryError {
    let lost_connection = is_connection_error(&error);
    let message = map_diesel_error_message(error, "tenant listing");
    if lost_connection {
        TenantRepositoryError::connection(message)
    } else {
        TenantRepositoryError::query(message)
    }
}

/// Keep only rows that carry a non-blank login.
fn into_tenant((id, name, api_login): (Uuid, String, Option<String>)) -> Option<Tenant> {
    let api_login = api_login.filter(|login| !login.trim().is_empty())?;
    Some(Tenant::new(TenantId::new(id), ApiLogin::new(api_login), name))
}

#[async_trait::async_trait]
impl TenantRepository for DieselTenantRepository {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, TenantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = organizations::table
            .filter(organizations::iiko_api_login.is_not_null())
            .order(organizations::created_at.asc())
            .select((
                organizations::id,
                organizations::name,
                organizations::iiko_api_login,
            ))
            .load::<(Uuid, String, Option<String>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().filter_map(into_tenant).collect())
    }
}
