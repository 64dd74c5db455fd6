//! Driven port for the upstream ordering API.
//!
//! Adapters implementing [`OrderSource`] are thin protocol translators: one
//! HTTP request per call, no retries, no caching. Retry and recovery policy
//! belongs to the sync engine.

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ApiLogin, RawOrderRecord, Revision};

/// Upstream error code signalling that a revision can no longer be resumed.
pub const TOO_OLD_REVISION_CODE: &str = "TOO_OLD_REVISION";

/// Bearer token issued by the upstream API for one tenant.
///
/// The value is a secret; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Records returned by one incremental fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RevisionBatch {
    /// Orders changed since the requested revision, across all sub-organisations.
    pub records: Vec<RawOrderRecord>,
    /// Highest revision covered by this batch.
    pub max_revision: Revision,
}

define_port_error! {
    /// Errors surfaced by the upstream ordering API.
    pub enum OrderSourceError {
        /// The credential exchange was refused.
        Authentication { message: String } =>
            "upstream authentication failed: {message}",
        /// The requested start revision predates retained upstream history.
        TooOldRevision { correlation_id: String, description: String } =>
            "upstream revision too old ({correlation_id}): {description}",
        /// Any other non-success response carrying the structured error body.
        Rejected { status: u16, error: String, description: String } =>
            "upstream rejected request with status {status} ({error}): {description}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "upstream transport failed: {message}",
        /// The request exceeded the client timeout.
        Timeout { message: String } =>
            "upstream request timed out: {message}",
        /// A success response could not be decoded.
        Decode { message: String } =>
            "upstream response decode failed: {message}",
    }
}

impl OrderSourceError {
    /// Whether this is the distinguished stale-cursor signal.
    pub fn is_too_old_revision(&self) -> bool {
        matches!(self, Self::TooOldRevision { .. })
    }
}

/// Port for the upstream ordering API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Exchange the tenant API login for a bearer token.
    async fn authenticate(&self, api_login: &ApiLogin) -> Result<BearerToken, OrderSourceError>;

    /// List the sub-organisation identifiers the token grants access to.
    async fn list_sub_organizations(
        &self,
        token: &BearerToken,
    ) -> Result<Vec<String>, OrderSourceError>;

    /// Derive a starting revision from recent orders in every status.
    ///
    /// Used for cold start and for stale-cursor recovery.
    async fn fetch_initial_revision(
        &self,
        token: &BearerToken,
        sub_organizations: &[String],
    ) -> Result<Revision, OrderSourceError>;

    /// Fetch orders changed since `revision`.
    ///
    /// Fails with [`OrderSourceError::TooOldRevision`] when the upstream has
    /// compacted history past `revision`.
    async fn fetch_since(
        &self,
        token: &BearerToken,
        sub_organizations: &[String],
        revision: Revision,
    ) -> Result<RevisionBatch, OrderSourceError>;
}
