//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for notification times and queue deadlines.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whole seconds from `now` until `deadline`, saturating at zero.
#[must_use]
pub fn seconds_until(deadline: Timestamp, now: Timestamp) -> u64 {
    u64::try_from((deadline - now).num_seconds()).unwrap_or(0)
}
