//! Tick phases and per-tick results.

use std::fmt;

use crate::domain::{Revision, SyncError};

/// Stage of one tenant tick, used to attribute failures in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    /// Obtaining a bearer token and listing sub-organisations.
    Authenticating,
    /// Loading the stored cursor or bootstrapping a new one.
    CursorResolving,
    /// Incremental fetch, including one stale-cursor recovery.
    Fetching,
    /// Persisting the batch and advancing the cursor.
    Ingesting,
    /// Handing the processed batch to the publisher.
    Publishing,
}

impl TickPhase {
    /// Stable snake-case label used as a log field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticating => "authenticating",
            Self::CursorResolving => "cursor_resolving",
            Self::Fetching => "fetching",
            Self::Ingesting => "ingesting",
            Self::Publishing => "publishing",
        }
    }
}

impl fmt::Display for TickPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tick that ended early, with the phase that failed.
///
/// Ticks that fail leave the stored cursor untouched unless the failure
/// happened after a stale-cursor reset was persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("order sync tick failed while {phase}: {error}")]
pub struct TickError {
    /// Phase in which the tick stopped.
    pub phase: TickPhase,
    /// Underlying failure.
    #[source]
    pub error: SyncError,
}

impl TickError {
    /// Pair `error` with the phase it occurred in.
    pub fn new(phase: TickPhase, error: impl Into<SyncError>) -> Self {
        Self {
            phase,
            error: error.into(),
        }
    }

    /// Adapter for `map_err` that tags any error with `phase`.
    pub(super) fn at<E>(phase: TickPhase) -> impl FnOnce(E) -> Self
    where
        E: Into<SyncError>,
    {
        move |error| Self::new(phase, error)
    }
}

/// Summary of a completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Revision the successful incremental fetch started from.
    pub starting_revision: Revision,
    /// Revision stored once the tick finished.
    pub revision: Revision,
    /// Number of orders persisted.
    pub ingested: usize,
    /// Whether the stored cursor was replaced by a stale-cursor reset.
    pub cursor_reset: bool,
    /// Whether the publisher accepted the batch.
    pub published: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TickPhase::Authenticating, "authenticating")]
    #[case(TickPhase::CursorResolving, "cursor_resolving")]
    #[case(TickPhase::Fetching, "fetching")]
    #[case(TickPhase::Ingesting, "ingesting")]
    #[case(TickPhase::Publishing, "publishing")]
    fn phase_labels_are_snake_case(#[case] phase: TickPhase, #[case] label: &str) {
        assert_eq!(phase.to_string(), label);
    }

    #[test]
    fn tick_error_names_phase_and_keeps_source() {
        let error = TickError::new(TickPhase::Fetching, SyncError::transient("reset by peer"));

        assert_eq!(
            error.to_string(),
            "order sync tick failed while fetching: upstream request failed: reset by peer"
        );
        let source = std::error::Error::source(&error).expect("source error");
        assert!(source.to_string().contains("reset by peer"));
    }
}
