//! Driven port for notifying subscribers about freshly ingested orders.
//!
//! Publishing is best-effort: the engine logs failures and never rolls back
//! ingestion or the cursor advance because of them.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{PersistedOrder, TenantId};

define_port_error! {
    /// Errors raised while publishing order updates.
    pub enum OrderPublisherError {
        /// The downstream channel is unavailable.
        Unavailable { message: String } =>
            "order publisher unavailable: {message}",
        /// An order could not be encoded for the channel.
        Encode { message: String } =>
            "order publisher encode failed: {message}",
    }
}

/// Port for the downstream publish channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderPublisher: Send + Sync {
    /// Publish one processed batch for `tenant_id`.
    async fn publish(
        &self,
        tenant_id: TenantId,
        orders: &[PersistedOrder],
    ) -> Result<(), OrderPublisherError>;
}

/// Publisher that drops every batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpOrderPublisher;

#[async_trait]
impl OrderPublisher for NoOpOrderPublisher {
    async fn publish(
        &self,
        _tenant_id: TenantId,
        _orders: &[PersistedOrder],
    ) -> Result<(), OrderPublisherError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn no_op_publisher_accepts_any_batch() {
        NoOpOrderPublisher
            .publish(TenantId::new(Uuid::nil()), &[])
            .await
            .expect("no-op publish succeeds");
    }

    #[test]
    fn encode_errors_carry_their_message() {
        let error = OrderPublisherError::encode("order 7 could not be encoded");
        assert_eq!(
            error.to_string(),
            "order publisher encode failed: order 7 could not be encoded"
        );
    }
}
