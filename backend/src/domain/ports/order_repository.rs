//! Driven port for persisting normalised orders.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::PersistedOrder;

define_port_error! {
    /// Errors raised while persisting an order batch.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// An insert failed; the whole batch was rolled back.
        Query { message: String } =>
            "order repository query failed: {message}",
    }
}

/// Port for writing order batches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert every order in one transaction.
    ///
    /// Either all rows are committed or none are. Orders are inserted as new
    /// rows; the batch is not deduplicated against earlier inserts.
    async fn insert_orders(&self, orders: &[PersistedOrder]) -> Result<(), OrderRepositoryError>;
}
