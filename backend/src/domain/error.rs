//! Engine-level error taxonomy.
//!
//! Port adapters surface their own error enums; the engine folds them into
//! [`SyncError`] so tick failures can be logged uniformly. Only
//! [`SyncError::Config`] is fatal, and only at engine start.

use super::ports::{
    OrderRepositoryError, OrderSourceError, RevisionRepositoryError, define_port_error,
};

define_port_error! {
    /// Failures raised while synchronising one tenant.
    pub enum SyncError {
        /// The upstream system rejected the tenant credential.
        Auth { message: String } =>
            "upstream rejected tenant credential: {message}",
        /// The requested revision is older than the upstream keeps history for.
        StaleCursor { message: String } =>
            "revision too old to resume from: {message}",
        /// Any other upstream failure; the next tick retries from scratch.
        Transient { message: String } =>
            "upstream request failed: {message}",
        /// Transforming or persisting a fetched batch failed; nothing was committed.
        Ingestion { message: String } =>
            "order ingestion failed: {message}",
        /// Reading or writing the revision watermark failed.
        Storage { message: String } =>
            "revision storage failed: {message}",
        /// The engine cannot start.
        Config { message: String } =>
            "order sync configuration invalid: {message}",
    }
}

impl SyncError {
    /// Whether this is the stale-cursor signal.
    pub fn is_stale_cursor(&self) -> bool {
        matches!(self, Self::StaleCursor { .. })
    }
}

impl From<OrderSourceError> for SyncError {
    fn from(error: OrderSourceError) -> Self {
        match error {
            OrderSourceError::Authentication { message } => Self::auth(message),
            OrderSourceError::TooOldRevision { .. } => Self::stale_cursor(error.to_string()),
            other => Self::transient(other.to_string()),
        }
    }
}

impl From<RevisionRepositoryError> for SyncError {
    fn from(error: RevisionRepositoryError) -> Self {
        Self::storage(error.to_string())
    }
}

impl From<OrderRepositoryError> for SyncError {
    fn from(error: OrderRepositoryError) -> Self {
        Self::ingestion(error.to_string())
    }
}
