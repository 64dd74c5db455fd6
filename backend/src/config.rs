//! Order sync settings loaded via OrthoConfig.
//!
//! Values come from `ORDER_SYNC_*` environment variables, configuration files
//! and command-line flags. Unset values fall back to the defaults below.

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::iiko::DEFAULT_IIKO_BASE_URL;
use crate::outbound::persistence::PoolConfig;

/// Errors raised while resolving settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("database URL missing: set ORDER_SYNC_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// The upstream base URL does not parse.
    #[error("invalid upstream base URL {value}: {message}")]
    InvalidBaseUrl { value: String, message: String },
    /// A numeric setting must be strictly positive.
    #[error("{name} must be greater than zero")]
    NotPositive { name: &'static str },
}

/// Configuration values controlling the order sync service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ORDER_SYNC")]
pub struct SyncSettings {
    /// PostgreSQL connection URL. Falls back to `DATABASE_URL` when omitted.
    pub database_url: Option<String>,
    /// Upstream ordering API base URL.
    pub iiko_base_url: Option<String>,
    /// Seconds between two ticks of the same tenant.
    #[ortho_config(default = 60)]
    pub poll_interval_secs: u64,
    /// Per-request timeout for upstream calls, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Look-back window used to derive a tenant's initial revision, in hours.
    #[ortho_config(default = 3)]
    pub initial_window_hours: u64,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Connections the pool keeps open while idle.
    #[ortho_config(default = 1)]
    pub pool_min_idle: u32,
    /// Seconds to wait for a pooled connection before failing the call.
    #[ortho_config(default = 30)]
    pub pool_connection_timeout_secs: u64,
}

impl SyncSettings {
    /// Return the configured database URL, falling back to `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when neither source holds
    /// a non-blank value.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .or_else(|| env::var("DATABASE_URL").ok())
            .filter(|value| !value.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Return the upstream base URL, falling back to the public API.
    ///
    /// A trailing slash is added when missing so endpoint paths join below
    /// the configured prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not parse.
    pub fn iiko_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.iiko_base_url.as_deref().unwrap_or(DEFAULT_IIKO_BASE_URL);
        let normalised = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalised).map_err(|error| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Return the tick period.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotPositive`] for a zero interval.
    pub fn poll_interval(&self) -> Result<Duration, SettingsError> {
        positive("poll_interval_secs", self.poll_interval_secs).map(Duration::from_secs)
    }

    /// Return the upstream request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotPositive`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        positive("request_timeout_secs", self.request_timeout_secs).map(Duration::from_secs)
    }

    /// Return the initial revision look-back window.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotPositive`] for a zero window.
    pub fn initial_window(&self) -> Result<Duration, SettingsError> {
        positive("initial_window_hours", self.initial_window_hours)
            .map(|hours| Duration::from_secs(hours.saturating_mul(3600)))
    }

    /// Build the connection pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] without a database URL
    /// and [`SettingsError::NotPositive`] for a zero pool size or checkout
    /// timeout.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        if self.pool_max_size == 0 {
            return Err(SettingsError::NotPositive {
                name: "pool_max_size",
            });
        }
        let timeout = positive(
            "pool_connection_timeout_secs",
            self.pool_connection_timeout_secs,
        )?;
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.pool_max_size)
            .with_min_idle(Some(self.pool_min_idle))
            .with_connection_timeout(Duration::from_secs(timeout)))
    }
}

fn positive(name: &'static str, value: u64) -> Result<u64, SettingsError> {
    if value == 0 {
        Err(SettingsError::NotPositive { name })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for order sync settings resolution.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "ORDER_SYNC_DATABASE_URL",
        "ORDER_SYNC_IIKO_BASE_URL",
        "ORDER_SYNC_POLL_INTERVAL_SECS",
        "ORDER_SYNC_REQUEST_TIMEOUT_SECS",
        "ORDER_SYNC_INITIAL_WINDOW_HOURS",
        "ORDER_SYNC_POOL_MAX_SIZE",
        "ORDER_SYNC_POOL_MIN_IDLE",
        "ORDER_SYNC_POOL_CONNECTION_TIMEOUT_SECS",
        "DATABASE_URL",
    ];

    fn cleared_env() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    fn with_overrides(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        let mut vars = cleared_env();
        for (name, value) in overrides {
            if let Some(slot) = vars.iter_mut().find(|(var, _)| var == name) {
                slot.1 = Some((*value).to_owned());
            }
        }
        vars
    }

    fn load_from_empty_args() -> SyncSettings {
        SyncSettings::load_from_iter([OsString::from("order-sync")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_env());

        let settings = load_from_empty_args();
        assert_eq!(settings.poll_interval(), Ok(Duration::from_secs(60)));
        assert_eq!(settings.request_timeout(), Ok(Duration::from_secs(10)));
        assert_eq!(
            settings.initial_window(),
            Ok(Duration::from_secs(3 * 3600))
        );
        assert_eq!(
            settings.iiko_base_url().map(String::from).as_deref(),
            Ok("https://api-ru.iiko.services/")
        );
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
        assert_eq!(
            settings.pool_config(),
            Err(SettingsError::MissingDatabaseUrl)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(with_overrides(&[
            ("ORDER_SYNC_DATABASE_URL", "postgres://sync@localhost/orders"),
            ("ORDER_SYNC_IIKO_BASE_URL", "http://127.0.0.1:9000/api"),
            ("ORDER_SYNC_POLL_INTERVAL_SECS", "15"),
            ("ORDER_SYNC_REQUEST_TIMEOUT_SECS", "4"),
            ("ORDER_SYNC_INITIAL_WINDOW_HOURS", "24"),
            ("ORDER_SYNC_POOL_MAX_SIZE", "3"),
            ("ORDER_SYNC_POOL_MIN_IDLE", "0"),
            ("ORDER_SYNC_POOL_CONNECTION_TIMEOUT_SECS", "5"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url().as_deref(),
            Ok("postgres://sync@localhost/orders")
        );
        assert_eq!(
            settings.iiko_base_url().map(String::from).as_deref(),
            Ok("http://127.0.0.1:9000/api/")
        );
        assert_eq!(settings.poll_interval(), Ok(Duration::from_secs(15)));
        assert_eq!(settings.request_timeout(), Ok(Duration::from_secs(4)));
        assert_eq!(settings.initial_window(), Ok(Duration::from_secs(86_400)));
        assert_eq!(
            settings.pool_config(),
            Ok(PoolConfig::new("postgres://sync@localhost/orders")
                .with_max_size(3)
                .with_min_idle(Some(0))
                .with_connection_timeout(Duration::from_secs(5)))
        );
    }

    #[rstest]
    fn database_url_falls_back_to_shared_variable() {
        let _guard = lock_env(with_overrides(&[(
            "DATABASE_URL",
            "postgres://shared@localhost/orders",
        )]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url().as_deref(),
            Ok("postgres://shared@localhost/orders")
        );
        assert_eq!(
            settings.pool_config(),
            Ok(PoolConfig::new("postgres://shared@localhost/orders"))
        );
    }

    #[rstest]
    fn blank_database_url_is_rejected() {
        let _guard = lock_env(with_overrides(&[("ORDER_SYNC_DATABASE_URL", "  ")]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
    }

    #[rstest]
    #[case("ORDER_SYNC_POLL_INTERVAL_SECS", "poll_interval_secs")]
    #[case("ORDER_SYNC_REQUEST_TIMEOUT_SECS", "request_timeout_secs")]
    #[case("ORDER_SYNC_INITIAL_WINDOW_HOURS", "initial_window_hours")]
    #[case("ORDER_SYNC_POOL_MAX_SIZE", "pool_max_size")]
    #[case(
        "ORDER_SYNC_POOL_CONNECTION_TIMEOUT_SECS",
        "pool_connection_timeout_secs"
    )]
    fn zero_values_are_rejected(#[case] var: &'static str, #[case] name: &'static str) {
        let _guard = lock_env(with_overrides(&[
            (var, "0"),
            ("ORDER_SYNC_DATABASE_URL", "postgres://sync@localhost/orders"),
        ]));

        let settings = load_from_empty_args();
        let errors = [
            settings.poll_interval().err(),
            settings.request_timeout().err(),
            settings.initial_window().err(),
            settings.pool_config().err(),
        ];
        assert_eq!(
            errors.into_iter().flatten().collect::<Vec<_>>(),
            vec![SettingsError::NotPositive { name }]
        );
    }

    #[rstest]
    fn malformed_base_url_is_reported() {
        let _guard = lock_env(with_overrides(&[("ORDER_SYNC_IIKO_BASE_URL", "not a url")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.iiko_base_url(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
    }
}
