//! Delivery order representations.
//!
//! [`RawOrderRecord`] mirrors what the upstream ordering system sends and only
//! lives for one fetch-ingest cycle. [`PersistedOrder`] is the normalised row
//! written by ingestion and handed to the publisher.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::Serialize;

use super::TenantId;

/// Upstream delivery status vocabulary.
///
/// The numeric codes are stable and follow the upstream lifecycle order.
///
/// # Examples
/// ```
/// use order_sync::domain::DeliveryStatus;
///
/// let status: DeliveryStatus = "OnWay".parse().expect("known status");
/// assert_eq!(status, DeliveryStatus::OnWay);
/// assert_eq!(status.code(), 6);
/// assert_eq!(status.as_str(), "OnWay");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    /// Accepted by the upstream system but not yet confirmed.
    Unconfirmed,
    /// Waiting to be cooked.
    WaitCooking,
    /// Ready to start cooking.
    ReadyForCooking,
    /// Cooking in progress.
    CookingStarted,
    /// Cooking finished.
    CookingCompleted,
    /// Waiting for a courier.
    Waiting,
    /// Courier is en route.
    OnWay,
    /// Handed to the customer.
    Delivered,
    /// Closed in the upstream till.
    Closed,
    /// Cancelled.
    Cancelled,
}

impl DeliveryStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 10] = [
        Self::Unconfirmed,
        Self::WaitCooking,
        Self::ReadyForCooking,
        Self::CookingStarted,
        Self::CookingCompleted,
        Self::Waiting,
        Self::OnWay,
        Self::Delivered,
        Self::Closed,
        Self::Cancelled,
    ];

    /// Upstream wire spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfirmed => "Unconfirmed",
            Self::WaitCooking => "WaitCooking",
            Self::ReadyForCooking => "ReadyForCooking",
            Self::CookingStarted => "CookingStarted",
            Self::CookingCompleted => "CookingCompleted",
            Self::Waiting => "Waiting",
            Self::OnWay => "OnWay",
            Self::Delivered => "Delivered",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Stable internal status code, `0..=9`.
    pub const fn code(self) -> i16 {
        match self {
            Self::Unconfirmed => 0,
            Self::WaitCooking => 1,
            Self::ReadyForCooking => 2,
            Self::CookingStarted => 3,
            Self::CookingCompleted => 4,
            Self::Waiting => 5,
            Self::OnWay => 6,
            Self::Delivered => 7,
            Self::Closed => 8,
            Self::Cancelled => 9,
        }
    }
}

/// Error returned when a status string is not part of the upstream vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown delivery status '{0}'")]
pub struct UnknownDeliveryStatus(pub String);

impl FromStr for DeliveryStatus {
    type Err = UnknownDeliveryStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| UnknownDeliveryStatus(raw.to_owned()))
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery address exactly as the upstream system reports it.
///
/// Every component is free text; numeric-looking fields such as `floor` are
/// only interpreted during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawDeliveryAddress {
    /// City name.
    pub city: String,
    /// Street name.
    pub street: String,
    /// Postal index.
    pub index: String,
    /// House number.
    pub house: String,
    /// Building or block.
    pub building: String,
    /// Flat or apartment.
    pub flat: String,
    /// Entrance, usually numeric.
    pub entrance: String,
    /// Floor, usually numeric.
    pub floor: String,
    /// Courier-facing comment.
    pub comment: String,
}

/// One delivery order as fetched from upstream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawOrderRecord {
    /// Upstream order identifier.
    pub external_id: String,
    /// Upstream sub-organisation that owns the order.
    pub sub_organization_id: String,
    /// Order status string.
    pub status: String,
    /// Delivery-specific status string.
    pub delivery_status: String,
    /// Creation timestamp in the upstream date-time format.
    pub created_at: String,
    /// Promised delivery deadline in the upstream date-time format.
    pub complete_before: String,
    /// Customer name, possibly padded with whitespace.
    pub customer_name: String,
    /// Delivery address.
    pub address: RawDeliveryAddress,
    /// Delivery point longitude (WGS84).
    pub longitude: f64,
    /// Delivery point latitude (WGS84).
    pub latitude: f64,
    /// Order total.
    pub sum: f64,
}

/// Geographic point in `(longitude, latitude)` order, matching the storage
/// geometry convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeoPoint {
    /// Longitude (x).
    pub longitude: f64,
    /// Latitude (y).
    pub latitude: f64,
}

/// Normalised order row written by ingestion.
///
/// Rows are never updated by the sync engine once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedOrder {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Upstream order identifier.
    pub external_id: String,
    /// Upstream sub-organisation identifier.
    pub sub_organization_id: String,
    /// Trimmed customer name.
    pub customer_name: String,
    /// City.
    pub city: String,
    /// Street.
    pub street: String,
    /// House number.
    pub house: String,
    /// Building or block.
    pub building: String,
    /// Apartment (upstream `flat`).
    pub apartment: String,
    /// Floor; zero when the upstream value was not an integer.
    pub floor: i32,
    /// Entrance; zero when the upstream value was not an integer.
    pub entrance: i32,
    /// Courier-facing comment.
    pub comment: String,
    /// Exact order total.
    pub cost: BigDecimal,
    /// Upstream status string.
    pub status: String,
    /// Delivery location.
    pub location: GeoPoint,
    /// Creation time; the Unix epoch when the upstream value did not parse.
    pub created_at: NaiveDateTime,
}

impl PersistedOrder {
    /// Parse the stored status into the known vocabulary.
    pub fn delivery_status(&self) -> Option<DeliveryStatus> {
        self.status.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Unconfirmed", 0)]
    #[case("CookingCompleted", 4)]
    #[case("Delivered", 7)]
    #[case("Cancelled", 9)]
    fn parses_upstream_statuses(#[case] raw: &str, #[case] code: i16) {
        let status: DeliveryStatus = raw.parse().expect("status parses");
        assert_eq!(status.code(), code);
        assert_eq!(status.to_string(), raw);
    }

    #[test]
    fn status_codes_follow_lifecycle_order() {
        let codes: Vec<i16> = DeliveryStatus::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, (0..10).collect::<Vec<i16>>());
    }

    #[rstest]
    #[case("OnWay", Some(DeliveryStatus::OnWay))]
    #[case("Archived", None)]
    fn persisted_status_maps_onto_vocabulary(
        #[case] status: &str,
        #[case] expected: Option<DeliveryStatus>,
    ) {
        let order = PersistedOrder {
            tenant_id: TenantId::new(uuid::Uuid::nil()),
            external_id: "order-1".to_owned(),
            sub_organization_id: "sub-1".to_owned(),
            customer_name: String::new(),
            city: String::new(),
            street: String::new(),
            house: String::new(),
            building: String::new(),
            apartment: String::new(),
            floor: 0,
            entrance: 0,
            comment: String::new(),
            cost: BigDecimal::from(0),
            status: status.to_owned(),
            location: GeoPoint::default(),
            created_at: NaiveDateTime::default(),
        };
        assert_eq!(order.delivery_status(), expected);
    }

    #[rstest]
    #[case("onway")]
    #[case("")]
    #[case("Lost")]
    fn rejects_unknown_statuses(#[case] raw: &str) {
        let err = raw.parse::<DeliveryStatus>().expect_err("unknown status");
        assert_eq!(err, UnknownDeliveryStatus(raw.to_owned()));
    }
}
