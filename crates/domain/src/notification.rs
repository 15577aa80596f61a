//! Notifications and observer messages.
//!
//! Status updates (script queued, running, cancelled, failed) are shown to
//! users as toasts; script list changes are broadcast so every open view
//! stays in sync. Both travel as a [`PluginMessage`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::script::Script;
use crate::time::{Timestamp, now};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A status message about script activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: Timestamp,
}

impl Notification {
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: now(),
        }
    }

    /// `Queuing script: {name}`
    #[must_use]
    pub fn queued(name: &str) -> Self {
        Self::new(NotificationKind::Success, format!("Queuing script: {name}"))
    }

    /// `Running script: {name}`
    #[must_use]
    pub fn running(name: &str) -> Self {
        Self::new(NotificationKind::Success, format!("Running script: {name}"))
    }

    /// `Cancel script: {name}`
    #[must_use]
    pub fn cancelled(name: &str) -> Self {
        Self::new(NotificationKind::Warning, format!("Cancel script: {name}"))
    }

    /// `Invalid script G-code: {name}`
    #[must_use]
    pub fn invalid_commands(name: &str) -> Self {
        Self::new(
            NotificationKind::Error,
            format!("Invalid script G-code: {name}"),
        )
    }
}

/// Message delivered to observers (UI sessions, SSE clients).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PluginMessage {
    /// The full, current script list.
    Scripts { scripts: Vec<Script> },
    Notification(Notification),
}
