//! Lifecycle events emitted by the device host.
//!
//! The host reports device state transitions and job milestones. Only a
//! handful of them matter to end scripts; see [`LifecycleEvent`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Device state identifier as reported by the host.
///
/// Parsing is case-insensitive; [`Display`](fmt::Display) renders the
/// upper-case identifier (`OPERATIONAL`, `FINISHING`, …). Unrecognized
/// identifiers are preserved in [`DeviceState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceState {
    Offline,
    Operational,
    Printing,
    Pausing,
    Paused,
    Resuming,
    Cancelling,
    Finishing,
    Error,
    Other(String),
}

impl DeviceState {
    /// Whether the device is idle and ready to accept commands.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Operational)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Offline => "OFFLINE",
            Self::Operational => "OPERATIONAL",
            Self::Printing => "PRINTING",
            Self::Pausing => "PAUSING",
            Self::Paused => "PAUSED",
            Self::Resuming => "RESUMING",
            Self::Cancelling => "CANCELLING",
            Self::Finishing => "FINISHING",
            Self::Error => "ERROR",
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let state = match s.trim().to_ascii_uppercase().as_str() {
            "OFFLINE" => Self::Offline,
            "OPERATIONAL" => Self::Operational,
            "PRINTING" => Self::Printing,
            "PAUSING" => Self::Pausing,
            "PAUSED" => Self::Paused,
            "RESUMING" => Self::Resuming,
            "CANCELLING" => Self::Cancelling,
            "FINISHING" => Self::Finishing,
            "ERROR" => Self::Error,
            _ => Self::Other(s.trim().to_owned()),
        };
        Ok(state)
    }
}

impl From<String> for DeviceState {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(state) => state,
            Err(never) => match never {},
        }
    }
}

impl From<DeviceState> for String {
    fn from(state: DeviceState) -> Self {
        state.to_string()
    }
}

/// Payload of a job-completed event.
///
/// `time` is kept as the raw JSON value reported by the host; the template
/// layer decides whether it is a usable number of seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    /// File name of the completed job.
    #[serde(default)]
    pub name: Option<String>,
    /// Elapsed job time in seconds.
    #[serde(default)]
    pub time: Option<serde_json::Value>,
}

impl JobPayload {
    #[must_use]
    pub fn new(name: impl Into<String>, elapsed_secs: u64) -> Self {
        Self {
            name: Some(name.into()),
            time: Some(serde_json::Value::from(elapsed_secs)),
        }
    }
}

/// Device and job lifecycle notifications that drive the trigger state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The device moved to a new state.
    StateChanged { state_id: DeviceState },
    /// A job finished successfully.
    JobCompleted(JobPayload),
    JobStarted,
    JobCancelling,
    JobCancelled,
    JobFailed,
    /// A user opened a session and wants the current script list.
    UserSessionStarted,
    /// The host is shutting down.
    Shutdown,
    /// The device connection was lost.
    Disconnected,
}

impl LifecycleEvent {
    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "state_changed",
            Self::JobCompleted(_) => "job_completed",
            Self::JobStarted => "job_started",
            Self::JobCancelling => "job_cancelling",
            Self::JobCancelled => "job_cancelled",
            Self::JobFailed => "job_failed",
            Self::UserSessionStarted => "user_session_started",
            Self::Shutdown => "shutdown",
            Self::Disconnected => "disconnected",
        }
    }
}
