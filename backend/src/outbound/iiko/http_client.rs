//! Reqwest-backed adapter for the upstream ordering API.
//!
//! This adapter owns transport details only: endpoint paths, bearer headers,
//! the request timeout, HTTP error mapping and JSON decoding. Every port call
//! is exactly one POST with no retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::dto::{
    AccessTokenRequest, AccessTokenResponse, ByDeliveryDateRequest, ByRevisionRequest,
    DeliveriesResponse, ErrorResponseDto, OrganizationsRequest, OrganizationsResponse,
};
use crate::domain::ports::{
    BearerToken, OrderSource, OrderSourceError, RevisionBatch, TOO_OLD_REVISION_CODE,
};
use crate::domain::{ApiLogin, DeliveryStatus, Revision, UPSTREAM_DATE_TIME_FORMAT};

/// Public upstream API host.
pub const DEFAULT_IIKO_BASE_URL: &str = "https://api-ru.iiko.services";

const ACCESS_TOKEN_PATH: &str = "api/1/access_token";
const ORGANIZATIONS_PATH: &str = "api/1/organizations";
const BY_REVISION_PATH: &str = "api/1/deliveries/by_revision";
const BY_DELIVERY_DATE_PATH: &str = "api/1/deliveries/by_delivery_date_and_status";

const DEFAULT_INITIAL_WINDOW: Duration = Duration::from_secs(3 * 60 * 60);

/// Upstream ordering API client implementing [`OrderSource`].
pub struct IikoHttpClient {
    client: Client,
    base_url: Url,
    clock: Arc<dyn Clock>,
    initial_window: Duration,
}

impl IikoHttpClient {
    /// Build a client with an explicit per-request timeout.
    /// ```rust,ignore
    /// let client = IikoHttpClient::new(base_url, Duration::from_secs(10), Arc::new(DefaultClock))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            clock,
            initial_window: DEFAULT_INITIAL_WINDOW,
        })
    }

    /// Replace the look-back window used to derive the initial revision.
    pub fn with_initial_window(mut self, window: Duration) -> Self {
        self.initial_window = window;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, OrderSourceError> {
        self.base_url.join(path).map_err(|error| {
            OrderSourceError::transport(format!("invalid upstream endpoint {path}: {error}"))
        })
    }

    fn delivery_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = self.clock.utc();
        let from = TimeDelta::from_std(self.initial_window)
            .ok()
            .and_then(|window| to.checked_sub_signed(window))
            .unwrap_or(to);
        (from, to)
    }

    async fn send<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<(StatusCode, Vec<u8>), OrderSourceError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .client
            .post(self.endpoint(path)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }

    async fn post<B, R>(
        &self,
        path: &str,
        body: &B,
        token: &BearerToken,
    ) -> Result<R, OrderSourceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (status, body) = self.send(path, body, Some(token)).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        decode(path, &body)
    }
}

#[async_trait]
impl OrderSource for IikoHttpClient {
    async fn authenticate(&self, api_login: &ApiLogin) -> Result<BearerToken, OrderSourceError> {
        let request = AccessTokenRequest {
            api_login: api_login.expose(),
        };
        let (status, body) = self.send(ACCESS_TOKEN_PATH, &request, None).await?;
        if !status.is_success() {
            let message = status_message(status, &body);
            return Err(OrderSourceError::authentication(message));
        }
        let response: AccessTokenResponse = decode(ACCESS_TOKEN_PATH, &body)?;
        Ok(BearerToken::new(response.token))
    }

    async fn list_sub_organizations(
        &self,
        token: &BearerToken,
    ) -> Result<Vec<String>, OrderSourceError> {
        let request = OrganizationsRequest {
            organization_ids: None,
        };
        let response: OrganizationsResponse =
            self.post(ORGANIZATIONS_PATH, &request, token).await?;
        Ok(response.into_ids())
    }

    async fn fetch_initial_revision(
        &self,
        token: &BearerToken,
        sub_organizations: &[String],
    ) -> Result<Revision, OrderSourceError> {
        let (from, to) = self.delivery_window();
        let request = ByDeliveryDateRequest {
            organization_ids: sub_organizations,
            delivery_date_from: from.format(UPSTREAM_DATE_TIME_FORMAT).to_string(),
            delivery_date_to: to.format(UPSTREAM_DATE_TIME_FORMAT).to_string(),
            statuses: DeliveryStatus::ALL
                .iter()
                .map(|status| status.as_str())
                .collect(),
        };
        let response: DeliveriesResponse =
            self.post(BY_DELIVERY_DATE_PATH, &request, token).await?;
        Ok(Revision::new(response.max_revision))
    }

    async fn fetch_since(
        &self,
        token: &BearerToken,
        sub_organizations: &[String],
        revision: Revision,
    ) -> Result<RevisionBatch, OrderSourceError> {
        let request = ByRevisionRequest {
            organization_ids: sub_organizations,
            start_revision: revision.value(),
        };
        let response: DeliveriesResponse = self.post(BY_REVISION_PATH, &request, token).await?;
        Ok(response.into_batch())
    }
}

fn decode<R: DeserializeOwned>(path: &str, body: &[u8]) -> Result<R, OrderSourceError> {
    serde_json::from_slice(body).map_err(|error| {
        OrderSourceError::decode(format!("invalid JSON payload from {path}: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> OrderSourceError {
    if error.is_timeout() {
        OrderSourceError::timeout(error.to_string())
    } else {
        OrderSourceError::transport(error.to_string())
    }
}

/// Classify a non-success response by its structured error body.
fn map_status_error(status: StatusCode, body: &[u8]) -> OrderSourceError {
    match serde_json::from_slice::<ErrorResponseDto>(body) {
        Ok(payload) if payload.error == TOO_OLD_REVISION_CODE => {
            OrderSourceError::too_old_revision(payload.correlation_id, payload.error_description)
        }
        Ok(payload) if !payload.error.is_empty() || !payload.error_description.is_empty() => {
            OrderSourceError::rejected(status.as_u16(), payload.error, payload.error_description)
        }
        _ => OrderSourceError::rejected(status.as_u16(), "", body_preview(body)),
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let description = serde_json::from_slice::<ErrorResponseDto>(body)
        .ok()
        .map(|payload| payload.error_description)
        .filter(|description| !description.is_empty())
        .unwrap_or_else(|| body_preview(body));
    if description.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {description}", status.as_u16())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
