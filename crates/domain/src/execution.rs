//! Read model for deferred executions waiting in the timer queue.

use serde::{Deserialize, Serialize};

use crate::id::ExecutionId;
use crate::time::{Timestamp, seconds_until};

/// A script execution scheduled to dispatch after its delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingExecution {
    pub id: ExecutionId,
    pub name: String,
    /// Commands already rendered for the job that triggered the script.
    pub commands: Vec<String>,
    pub due_at: Timestamp,
    pub remaining_secs: u64,
}

impl PendingExecution {
    /// Build the read model as seen at `now`.
    #[must_use]
    pub fn new(
        id: ExecutionId,
        name: String,
        commands: Vec<String>,
        due_at: Timestamp,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            commands,
            due_at,
            remaining_secs: seconds_until(due_at, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_compute_remaining_seconds_from_deadline() {
        let start = now();
        let pending = PendingExecution::new(
            ExecutionId::new(),
            "Cool down".to_string(),
            vec!["M104 S0".to_string()],
            start + chrono::Duration::seconds(30),
            start,
        );
        assert_eq!(pending.remaining_secs, 30);
    }
}
