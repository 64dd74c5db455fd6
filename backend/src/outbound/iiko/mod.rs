//! Upstream ordering API outbound adapter.
//!
//! Provides a thin HTTP implementation of the `OrderSource` port.

mod dto;
mod http_client;

pub use http_client::{DEFAULT_IIKO_BASE_URL, IikoHttpClient};
