//! In-memory port implementations shared by the app tests.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use endscripts_domain::error::EndScriptsError;
use endscripts_domain::lifecycle::DeviceState;
use endscripts_domain::notification::{Notification, NotificationKind};
use endscripts_domain::script::Script;

use crate::ports::{Device, Notifier, ScriptSettings};

// ── Device spy ─────────────────────────────────────────────────────

pub struct SpyDevice {
    state: Mutex<DeviceState>,
    sent: Mutex<Vec<Vec<String>>>,
}

impl SpyDevice {
    pub fn new(state: DeviceState) -> Self {
        Self {
            state: Mutex::new(state),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_state(&self, state: DeviceState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn sent(&self) -> Vec<Vec<String>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Device for SpyDevice {
    fn send(&self, commands: Vec<String>) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        self.sent.lock().unwrap().push(commands);
        async { Ok(()) }
    }

    fn current_state(&self) -> impl Future<Output = DeviceState> + Send {
        let state = self.state.lock().unwrap().clone();
        async { state }
    }
}

/// Device whose command interface takes `latency` to accept a batch.
pub struct SlowDevice {
    latency: Duration,
    sent: Mutex<Vec<Vec<String>>>,
}

impl SlowDevice {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Vec<String>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Device for SlowDevice {
    fn send(&self, commands: Vec<String>) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        async move {
            tokio::time::sleep(self.latency).await;
            self.sent.lock().unwrap().push(commands);
            Ok(())
        }
    }

    fn current_state(&self) -> impl Future<Output = DeviceState> + Send {
        async { DeviceState::Operational }
    }
}

// ── Notifier spy ───────────────────────────────────────────────────

#[derive(Default)]
pub struct SpyNotifier {
    notifications: Mutex<Vec<Notification>>,
    broadcasts: Mutex<Vec<Vec<Script>>>,
}

impl SpyNotifier {
    pub fn messages(&self) -> Vec<(NotificationKind, String)> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| (n.kind, n.message.clone()))
            .collect()
    }

    pub fn broadcasts(&self) -> Vec<Vec<Script>> {
        self.broadcasts.lock().unwrap().clone()
    }
}

impl Notifier for SpyNotifier {
    fn notify(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        self.notifications.lock().unwrap().push(notification);
        async { Ok(()) }
    }

    fn broadcast(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        self.broadcasts.lock().unwrap().push(scripts.to_vec());
        async { Ok(()) }
    }
}

// ── In-memory settings ─────────────────────────────────────────────

pub struct MemorySettings {
    raw: Value,
    staged: Mutex<Option<Vec<Script>>>,
    saved: Mutex<Vec<Vec<Script>>>,
}

impl MemorySettings {
    pub fn with(raw: Value) -> Self {
        Self {
            raw,
            staged: Mutex::new(None),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Every script list flushed by `save`, oldest first.
    pub fn saved(&self) -> Vec<Vec<Script>> {
        self.saved.lock().unwrap().clone()
    }
}

impl ScriptSettings for MemorySettings {
    fn get(&self) -> impl Future<Output = Result<Value, EndScriptsError>> + Send {
        let raw = self.raw.clone();
        async { Ok(raw) }
    }

    fn set(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        *self.staged.lock().unwrap() = Some(scripts.to_vec());
        async { Ok(()) }
    }

    fn save(&self) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        if let Some(scripts) = self.staged.lock().unwrap().take() {
            self.saved.lock().unwrap().push(scripts);
        }
        async { Ok(()) }
    }
}
