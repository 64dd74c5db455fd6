//! Incremental order synchronisation from an upstream ordering API.
//!
//! Tenants are polled independently. Each tick fetches orders changed since
//! the tenant's revision cursor, stores them in one transaction and publishes
//! the stored batch downstream.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod config;
pub mod domain;
pub mod outbound;
