//! PostgreSQL-backed order batch storage.
//!
//! Each batch is written inside one transaction, so a failing row rolls back
//! every row inserted before it. Inserts are plain appends; the table has no
//! uniqueness constraint on the upstream order id.

use diesel::sql_query;
use diesel::sql_types::{Double, Integer, Numeric, Text, Timestamp, Uuid as SqlUuid};
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::PersistedOrder;
use crate::domain::ports::{OrderRepository, OrderRepositoryError};

use super::diesel_helpers::{
    is_connection_error, map_diesel_error_message, map_pool_error_message,
};
use super::pool::{DbPool, PoolError};

const INSERT_ORDER_SQL: &str = r#"
INSERT INTO orders (
    organization_id, external_id, sub_organization_id, customer_name,
    city, street, house, building, apartment, floor, entrance, comment,
    cost, status, location, created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, point($15, $16), $17)
"#;

/// Diesel-backed implementation of the order storage port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    OrderRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    let lost_connection = is_connection_error(&error);
    let message = map_diesel_error_message(error, "order batch insert");
    if lost_connection {
        OrderRepositoryError::connection(message)
    } else {
        OrderRepositoryError::query(message)
    }
}

#[async_trait::async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn insert_orders(&self, orders: &[PersistedOrder]) -> Result<(), OrderRepositoryError> {
        if orders.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                for order in orders {
                    sql_query(INSERT_ORDER_SQL)
                        .bind::<SqlUuid, _>(order.tenant_id.as_uuid())
                        .bind::<Text, _>(&order.external_id)
                        .bind::<Text, _>(&order.sub_organization_id)
                        .bind::<Text, _>(&order.customer_name)
                        .bind::<Text, _>(&order.city)
                        .bind::<Text, _>(&order.street)
                        .bind::<Text, _>(&order.house)
                        .bind::<Text, _>(&order.building)
                        .bind::<Text, _>(&order.apartment)
                        .bind::<Integer, _>(order.floor)
                        .bind::<Integer, _>(order.entrance)
                        .bind::<Text, _>(&order.comment)
                        .bind::<Numeric, _>(&order.cost)
                        .bind::<Text, _>(&order.status)
                        .bind::<Double, _>(order.location.longitude)
                        .bind::<Double, _>(order.location.latitude)
                        .bind::<Timestamp, _>(order.created_at)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
