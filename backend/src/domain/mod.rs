//! Domain primitives, ports and the order sync engine.
//!
//! Purpose: keep the synchronisation rules independent of transport and
//! storage. Adapters in `outbound` implement the traits in [`ports`]; the
//! engine in [`order_sync`] only ever talks to those traits.
//!
//! Public surface:
//! - [`OrderSyncEngine`]: one periodic worker per tenant.
//! - [`CredentialCache`] / [`CursorStore`]: per-tenant in-memory state.
//! - [`OrderIngestion`]: transactional transform-and-persist of a batch.
//! - [`SyncError`]: the failure taxonomy shared by all of the above.

pub mod credential_cache;
pub mod cursor_store;
pub mod error;
pub mod ingestion;
pub mod order;
pub mod order_sync;
pub mod ports;
pub mod revision;
pub mod tenant;

pub use self::credential_cache::CredentialCache;
pub use self::cursor_store::CursorStore;
pub use self::error::SyncError;
pub use self::ingestion::{
    OrderIngestion, UPSTREAM_DATE_TIME_FORMAT, normalize_order, parse_upstream_timestamp,
};
pub use self::order::{
    DeliveryStatus, GeoPoint, PersistedOrder, RawDeliveryAddress, RawOrderRecord,
    UnknownDeliveryStatus,
};
pub use self::order_sync::{
    OrderSyncConfig, OrderSyncEngine, OrderSyncHandle, OrderSyncPorts, TickError, TickOutcome,
    TickPhase,
};
pub use self::revision::Revision;
pub use self::tenant::{ApiLogin, Tenant, TenantId};
