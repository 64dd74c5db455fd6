//! Driven port for listing tenants at engine start.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Tenant;

define_port_error! {
    /// Errors raised while loading tenants.
    pub enum TenantRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "tenant repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "tenant repository query failed: {message}",
    }
}

/// Port for reading the tenants whose orders should be synchronised.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// List every tenant that has an upstream credential configured.
    async fn list_tenants(&self) -> Result<Vec<Tenant>, TenantRepositoryError>;
}

/// Fixture repository returning a fixed tenant list.
#[derive(Debug, Clone, Default)]
pub struct FixtureTenantRepository {
    tenants: Vec<Tenant>,
}

impl FixtureTenantRepository {
    /// Serve `tenants` from every call.
    pub fn new(tenants: Vec<Tenant>) -> Self {
        Self { tenants }
    }
}

#[async_trait]
impl TenantRepository for FixtureTenantRepository {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, TenantRepositoryError> {
        Ok(self.tenants.clone())
    }
}
