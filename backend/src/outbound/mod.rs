//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **iiko**: HTTP client for the upstream ordering API
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **publish**: downstream order update publisher
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod iiko;
pub mod persistence;
pub mod publish;
