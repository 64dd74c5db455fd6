//! Tenant identity and upstream credentials.
//!
//! A tenant is one organisation whose delivery orders are synchronised from
//! the upstream ordering system. Tenants are loaded once when the engine
//! starts; rows added afterwards are only picked up after a restart.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable internal identifier for a tenant organisation.
///
/// # Examples
/// ```
/// use order_sync::domain::TenantId;
/// use uuid::Uuid;
///
/// let raw = Uuid::nil();
/// let id = TenantId::new(raw);
/// assert_eq!(id.as_uuid(), raw);
/// assert_eq!(id.to_string(), raw.to_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Wrap a raw UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Underlying UUID.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TenantId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Upstream API login used to obtain bearer tokens for one tenant.
///
/// The value is a secret; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiLogin(String);

impl ApiLogin {
    /// Wrap a raw API login.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw login value for the authentication request body.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiLogin(<redacted>)")
    }
}

/// Organisation whose orders are synchronised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    /// Internal identifier.
    pub id: TenantId,
    /// Upstream API credential.
    pub api_login: ApiLogin,
    /// Display name used in logs.
    pub name: String,
}

impl Tenant {
    /// Build a tenant from its parts.
    pub fn new(id: TenantId, api_login: ApiLogin, name: impl Into<String>) -> Self {
        Self {
            id,
            api_login,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_login_debug_is_redacted() {
        let tenant = Tenant::new(TenantId::new(Uuid::nil()), ApiLogin::new("s3cret"), "Pizza");
        let rendered = format!("{tenant:?}");
        assert!(!rendered.contains("s3cret"), "secret leaked: {rendered}");
        assert!(rendered.contains("<redacted>"));
        assert_eq!(tenant.api_login.expose(), "s3cret");
    }
}
