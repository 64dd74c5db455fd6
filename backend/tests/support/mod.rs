//! Shared helpers for the embedded PostgreSQL integration suites.
//!
//! Each test gets a fresh temporary database on the shared cluster with the
//! order sync migration applied.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};

/// Schema applied to every temporary database.
const SCHEMA_SQL: &str = include_str!("../../migrations/2024-03-01-000000_create_order_sync/up.sql");

/// Render a `postgres` error with its SQLSTATE and message.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Whether `SKIP_TEST_CLUSTER` is set to a truthy value.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Keep the cluster password stable across processes reusing the data dir.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "order_sync_embedded_test");
        }
    }
}

/// Create a temporary database with the order sync schema applied.
pub fn provision_database() -> Result<TemporaryDatabase, String> {
    ensure_stable_password();
    let cluster = pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|error| format!("shared cluster: {error}"))?;
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4()))
        .map_err(|error| format!("create temporary database: {error:?}"))?;
    let url = database.url().to_string();
    let mut client = connect(&url)?;
    client
        .batch_execute(SCHEMA_SQL)
        .map_err(|error| format!("apply schema: {}", format_postgres_error(&error)))?;
    Ok(database)
}

/// Open a plain `postgres` client for seeding and assertions.
pub fn connect(url: &str) -> Result<Client, String> {
    Client::connect(url, NoTls).map_err(|error| format_postgres_error(&error))
}
