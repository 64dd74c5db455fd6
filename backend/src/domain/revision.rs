//! Upstream revision watermark.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic upstream revision marking how far incremental sync progressed.
///
/// # Examples
/// ```
/// use order_sync::domain::Revision;
///
/// let older = Revision::new(50);
/// let newer = Revision::new(105);
/// assert!(older < newer);
/// assert_eq!(newer.value(), 105);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(i64);

impl Revision {
    /// Wrap a raw revision number.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw revision number.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for Revision {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
