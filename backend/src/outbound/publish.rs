//! Tracing-backed order publisher.
//!
//! Subscriber transport lives outside this service. The adapter renders each
//! batch exactly as a subscriber would receive it and emits it on the
//! `order_sync::publish` tracing target, one event per order.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{OrderPublisher, OrderPublisherError};
use crate::domain::{DeliveryStatus, PersistedOrder, TenantId};

/// Channel name subscribers listen on for `tenant_id`.
pub fn order_channel(tenant_id: TenantId) -> String {
    format!("orders:{tenant_id}")
}

/// Publisher that logs every order as a JSON payload on its tenant channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOrderPublisher;

impl TracingOrderPublisher {
    fn encode(orders: &[PersistedOrder]) -> Result<Vec<String>, OrderPublisherError> {
        orders
            .iter()
            .map(|order| {
                serde_json::to_string(order).map_err(|error| {
                    OrderPublisherError::encode(format!(
                        "order {} could not be encoded: {error}",
                        order.external_id
                    ))
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderPublisher for TracingOrderPublisher {
    async fn publish(
        &self,
        tenant_id: TenantId,
        orders: &[PersistedOrder],
    ) -> Result<(), OrderPublisherError> {
        let channel = order_channel(tenant_id);
        let payloads = Self::encode(orders)?;
        for (order, payload) in orders.iter().zip(payloads) {
            let status_code = order.delivery_status().map(DeliveryStatus::code);
            info!(
                target: "order_sync::publish",
                %channel,
                status_code,
                %payload,
                "order update"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, PersistedOrder};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDateTime;
    use serde_json::Value;
    use std::str::FromStr;
    use uuid::Uuid;

    fn order(tenant_id: TenantId) -> PersistedOrder {
        PersistedOrder {
            tenant_id,
            external_id: "order-1".to_owned(),
            sub_organization_id: "sub-1".to_owned(),
            customer_name: "Ivan".to_owned(),
            city: "Kazan".to_owned(),
            street: "Baumana".to_owned(),
            house: "12".to_owned(),
            building: String::new(),
            apartment: "34".to_owned(),
            floor: 5,
            entrance: 3,
            comment: String::new(),
            cost: BigDecimal::from_str("1250.50").expect("decimal"),
            status: "OnWay".to_owned(),
            location: GeoPoint {
                longitude: 49.12,
                latitude: 55.78,
            },
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn channel_is_scoped_to_tenant() {
        let tenant_id = TenantId::new(Uuid::nil());
        assert_eq!(
            order_channel(tenant_id),
            "orders:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn payload_uses_camel_case_fields() {
        let tenant_id = TenantId::new(Uuid::from_u128(5));
        let payloads = TracingOrderPublisher::encode(&[order(tenant_id)]).expect("encodes");

        let decoded: Value = serde_json::from_str(&payloads[0]).expect("valid JSON");
        assert_eq!(decoded["externalId"], "order-1");
        assert_eq!(decoded["customerName"], "Ivan");
        assert_eq!(decoded["location"]["latitude"], 55.78);
    }

    #[tokio::test]
    async fn publishing_an_empty_batch_succeeds() {
        TracingOrderPublisher
            .publish(TenantId::new(Uuid::nil()), &[])
            .await
            .expect("empty batch publishes");
    }
}
