//! DTOs for the upstream ordering API.
//!
//! Requests serialise straight from borrowed domain data. Responses decode
//! leniently: absent or `null` fields fall back to empty values so one sparse
//! order never fails a whole batch. Only the fields the engine depends on
//! (`token`, `maxRevision`) are required.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ports::RevisionBatch;
use crate::domain::{RawDeliveryAddress, RawOrderRecord, Revision};

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AccessTokenRequest<'a> {
    pub(super) api_login: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccessTokenResponse {
    pub(super) token: String,
}

/// `organizationIds: null` asks for every organisation the token can see.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrganizationsRequest {
    pub(super) organization_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct OrganizationsResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) organizations: Vec<OrganizationDto>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct OrganizationDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) id: String,
}

impl OrganizationsResponse {
    pub(super) fn into_ids(self) -> Vec<String> {
        self.organizations
            .into_iter()
            .map(|organization| organization.id)
            .filter(|id| !id.is_empty())
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ByRevisionRequest<'a> {
    pub(super) organization_ids: &'a [String],
    pub(super) start_revision: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ByDeliveryDateRequest<'a> {
    pub(super) organization_ids: &'a [String],
    pub(super) delivery_date_from: String,
    pub(super) delivery_date_to: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) statuses: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeliveriesResponse {
    pub(super) max_revision: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) orders_by_organizations: Vec<OrganizationOrdersDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrganizationOrdersDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) organization_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) orders: Vec<OrderDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrderDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) organization_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) order: OrderInfoDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrderInfoDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) delivery_status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) when_created: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) complete_before: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) customer: CustomerDto,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) delivery_point: DeliveryPointDto,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) sum: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CustomerDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DeliveryPointDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) coordinates: CoordinatesDto,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) address: AddressDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CoordinatesDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) latitude: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) longitude: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AddressDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) street: StreetDto,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) index: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) house: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) building: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) flat: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) entrance: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) floor: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StreetDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) city: CityDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CityDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) name: String,
}

/// Structured body carried by every non-success response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ErrorResponseDto {
    #[serde(default, deserialize_with = "nullable")]
    pub(super) correlation_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) error_description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub(super) error: String,
}

impl DeliveriesResponse {
    /// Flatten the per-organisation groups into one batch.
    pub(super) fn into_batch(self) -> RevisionBatch {
        let records = self
            .orders_by_organizations
            .into_iter()
            .flat_map(|group| {
                let organization_id = group.organization_id;
                group
                    .orders
                    .into_iter()
                    .map(move |order| order.into_raw_record(&organization_id))
            })
            .collect();
        RevisionBatch {
            records,
            max_revision: Revision::new(self.max_revision),
        }
    }
}

impl OrderDto {
    fn into_raw_record(self, group_organization_id: &str) -> RawOrderRecord {
        let Self {
            id,
            organization_id,
            order,
        } = self;
        let OrderInfoDto {
            status,
            delivery_status,
            when_created,
            complete_before,
            customer,
            delivery_point,
            sum,
        } = order;
        let DeliveryPointDto {
            coordinates,
            address,
        } = delivery_point;

        RawOrderRecord {
            external_id: id,
            sub_organization_id: if organization_id.is_empty() {
                group_organization_id.to_owned()
            } else {
                organization_id
            },
            status,
            delivery_status,
            created_at: when_created,
            complete_before,
            customer_name: customer.name,
            address: RawDeliveryAddress {
                city: address.street.city.name,
                street: address.street.name,
                index: address.index,
                house: address.house,
                building: address.building,
                flat: address.flat,
                entrance: address.entrance,
                floor: address.floor,
                comment: address.comment,
            },
            longitude: coordinates.longitude,
            latitude: coordinates.latitude,
            sum,
        }
    }
}
