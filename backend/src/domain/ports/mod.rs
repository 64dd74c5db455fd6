//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod order_publisher;
mod order_repository;
mod order_source;
mod revision_repository;
mod tenant_repository;

pub use order_publisher::{NoOpOrderPublisher, OrderPublisher, OrderPublisherError};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use order_source::MockOrderSource;
pub use order_source::{
    BearerToken, OrderSource, OrderSourceError, RevisionBatch, TOO_OLD_REVISION_CODE,
};
#[cfg(test)]
pub use revision_repository::MockRevisionRepository;
pub use revision_repository::{RevisionRepository, RevisionRepositoryError};
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
pub use tenant_repository::{FixtureTenantRepository, TenantRepository, TenantRepositoryError};
