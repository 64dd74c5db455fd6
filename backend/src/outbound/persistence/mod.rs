//! PostgreSQL persistence adapters built on Diesel.
//!
//! Every repository shares one [`DbPool`]. Domain code only sees the port
//! traits; nothing Diesel-specific crosses that boundary.

mod diesel_helpers;
mod diesel_order_repository;
mod diesel_revision_repository;
mod diesel_tenant_repository;
mod pool;
mod schema;

pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_revision_repository::DieselRevisionRepository;
pub use diesel_tenant_repository::DieselTenantRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
