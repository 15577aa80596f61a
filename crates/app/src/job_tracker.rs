//! Job state tracker — decides when a completed job should fire end scripts.
//!
//! A job is only "done" once the device is idle again. When the host reports
//! completion while the device is still finishing (moving to a park
//! position, cooling, …), the completion payload is held as a snapshot and
//! released on the `FINISHING → OPERATIONAL` transition.

use endscripts_domain::lifecycle::{DeviceState, JobPayload};

/// Last observed device state plus at most one pending job snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStateTracker {
    last_state: DeviceState,
    pending_job: Option<JobPayload>,
}

impl JobStateTracker {
    #[must_use]
    pub fn new(initial: DeviceState) -> Self {
        Self {
            last_state: initial,
            pending_job: None,
        }
    }

    /// Record a state change. Returns the pending job when this change
    /// completes it (`FINISHING → OPERATIONAL`); the snapshot is cleared.
    pub fn on_state_changed(&mut self, new_state: DeviceState) -> Option<JobPayload> {
        let finished = self.last_state == DeviceState::Finishing && new_state.is_operational();
        self.last_state = new_state;

        if finished { self.pending_job.take() } else { None }
    }

    /// Handle a job completion given the device's current state.
    ///
    /// Returns the payload to fire with when the device is already
    /// operational (dropping any older snapshot); otherwise keeps it as the
    /// snapshot, replacing the previous one.
    pub fn on_job_completed(
        &mut self,
        payload: JobPayload,
        current: &DeviceState,
    ) -> Option<JobPayload> {
        if current.is_operational() {
            self.pending_job = None;
            Some(payload)
        } else {
            self.pending_job = Some(payload);
            None
        }
    }

    /// Drop the pending snapshot, returning whether one existed.
    pub fn clear_pending(&mut self) -> bool {
        self.pending_job.take().is_some()
    }

    pub fn record(&mut self, state: DeviceState) {
        self.last_state = state;
    }

    #[must_use]
    pub fn last_state(&self) -> &DeviceState {
        &self.last_state
    }

    #[must_use]
    pub fn pending_job(&self) -> Option<&JobPayload> {
        self.pending_job.as_ref()
    }
}
