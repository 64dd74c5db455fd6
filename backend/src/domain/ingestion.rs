//! Transform-and-persist of fetched order batches.
//!
//! Normalisation is deliberately lenient: a malformed floor, entrance,
//! timestamp or total degrades to a zero value instead of failing the batch.
//! Only a storage failure aborts, and then nothing from the batch is kept.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use super::ports::OrderRepository;
use super::{GeoPoint, PersistedOrder, RawOrderRecord, SyncError, TenantId};

/// Upstream date-time layout, `yyyy-MM-dd HH:mm:ss.fff`.
pub const UPSTREAM_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// `%.f` accepts any number of fractional digits, including none.
const UPSTREAM_DATE_TIME_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Batch ingestion over an [`OrderRepository`].
pub struct OrderIngestion {
    repository: Arc<dyn OrderRepository>,
}

impl OrderIngestion {
    /// Build an ingestion step writing through `repository`.
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Normalise `records` and persist them in one transaction.
    ///
    /// Returns the persisted rows for publishing.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Ingestion`] when the repository rejects the
    /// batch; no row from the batch is committed in that case.
    pub async fn ingest(
        &self,
        tenant_id: TenantId,
        records: Vec<RawOrderRecord>,
    ) -> Result<Vec<PersistedOrder>, SyncError> {
        let orders = records
            .into_iter()
            .map(|record| normalize_order(tenant_id, record))
            .collect::<Vec<_>>();
        self.repository.insert_orders(&orders).await?;
        Ok(orders)
    }
}

/// Map one upstream record onto the storage representation.
///
/// # Examples
/// ```
/// use order_sync::domain::{RawOrderRecord, TenantId, normalize_order};
/// use uuid::Uuid;
///
/// let record = RawOrderRecord {
///     customer_name: "  Ada  ".to_owned(),
///     ..RawOrderRecord::default()
/// };
/// let order = normalize_order(TenantId::new(Uuid::nil()), record);
/// assert_eq!(order.customer_name, "Ada");
/// assert_eq!(order.floor, 0);
/// ```
pub fn normalize_order(tenant_id: TenantId, record: RawOrderRecord) -> PersistedOrder {
    let RawOrderRecord {
        external_id,
        sub_organization_id,
        status,
        created_at,
        customer_name,
        address,
        longitude,
        latitude,
        sum,
        ..
    } = record;

    PersistedOrder {
        tenant_id,
        external_id,
        sub_organization_id,
        customer_name: customer_name.trim().to_owned(),
        city: address.city,
        street: address.street,
        house: address.house,
        building: address.building,
        apartment: address.flat,
        floor: parse_lenient_i32(&address.floor),
        entrance: parse_lenient_i32(&address.entrance),
        comment: address.comment,
        cost: exact_cost(sum),
        status,
        location: GeoPoint {
            longitude,
            latitude,
        },
        created_at: parse_upstream_timestamp(&created_at),
    }
}

/// Parse an upstream timestamp, falling back to the Unix epoch.
pub fn parse_upstream_timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, UPSTREAM_DATE_TIME_PARSE_FORMAT).unwrap_or_default()
}

fn parse_lenient_i32(raw: &str) -> i32 {
    raw.parse().unwrap_or_default()
}

// The shortest round-trip rendering of the float keeps totals such as 1250.5
// exact instead of inheriting binary floating point noise.
fn exact_cost(sum: f64) -> BigDecimal {
    if !sum.is_finite() {
        return BigDecimal::default();
    }
    sum.to_string().parse().unwrap_or_default()
}
