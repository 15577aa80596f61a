//! Typed identifiers backed by UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a deferred script execution sitting in the timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(uuid::Uuid);

impl Default for ExecutionId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl ExecutionId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
