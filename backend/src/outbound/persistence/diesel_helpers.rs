//! Shared error mapping for the Diesel repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    error.into_message()
}

/// Extract a readable message from a Diesel error and emit debug context.
pub fn map_diesel_error_message(error: DieselError, operation: &str) -> String {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(error_message = %error, %operation, "diesel operation failed"),
    }
    format!("{operation}: {error}")
}

/// Whether the failure means the connection itself is gone.
pub fn is_connection_error(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_operation() {
        let message = map_diesel_error_message(DieselError::NotFound, "order revision lookup");
        assert_eq!(message, "order revision lookup: Record not found");
    }

    #[test]
    fn only_lost_connections_are_connection_errors() {
        assert!(is_connection_error(&DieselError::BrokenTransactionManager));
        assert!(!is_connection_error(&DieselError::NotFound));
        assert!(!is_connection_error(&DieselError::RollbackTransaction));
    }

    #[test]
    fn pool_messages_drop_the_prefix() {
        assert_eq!(
            map_pool_error_message(PoolError::checkout("timed out waiting for connection")),
            "timed out waiting for connection"
        );
    }
}
