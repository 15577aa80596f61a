//! Virtual printer — records command batches and tracks device state.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use endscripts_app::ports::Device;
use endscripts_domain::error::EndScriptsError;
use endscripts_domain::lifecycle::{DeviceState, LifecycleEvent};

/// Errors raised by the simulated device.
#[derive(Debug, thiserror::Error)]
pub enum PrinterError {
    #[error("printer is offline")]
    Offline,
}

impl From<PrinterError> for EndScriptsError {
    fn from(err: PrinterError) -> Self {
        Self::Device(Box::new(err))
    }
}

/// A simulated printer.
pub struct VirtualPrinter {
    state: Mutex<DeviceState>,
    sent: Mutex<Vec<Vec<String>>>,
}

impl Default for VirtualPrinter {
    fn default() -> Self {
        Self::new(DeviceState::Operational)
    }
}

impl VirtualPrinter {
    #[must_use]
    pub fn new(initial: DeviceState) -> Self {
        Self {
            state: Mutex::new(initial),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Follow a lifecycle event reported by the host.
    pub fn observe(&self, event: &LifecycleEvent) {
        let next = match event {
            LifecycleEvent::StateChanged { state_id } => state_id.clone(),
            LifecycleEvent::Disconnected => DeviceState::Offline,
            _ => return,
        };
        tracing::debug!(state = %next, "virtual printer state updated");
        *lock(&self.state) = next;
    }

    pub fn set_state(&self, state: DeviceState) {
        *lock(&self.state) = state;
    }

    #[must_use]
    pub fn state(&self) -> DeviceState {
        lock(&self.state).clone()
    }

    /// Every command batch received so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<Vec<String>> {
        lock(&self.sent).clone()
    }

    fn dispatch(&self, commands: Vec<String>) -> Result<(), PrinterError> {
        if *lock(&self.state) == DeviceState::Offline {
            tracing::warn!(commands = commands.len(), "virtual printer offline, dropping commands");
            return Err(PrinterError::Offline);
        }
        for command in &commands {
            tracing::info!(%command, "virtual printer received command");
        }
        lock(&self.sent).push(commands);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Device for VirtualPrinter {
    fn send(&self, commands: Vec<String>) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        let result = self.dispatch(commands).map_err(EndScriptsError::from);
        async { result }
    }

    fn current_state(&self) -> impl Future<Output = DeviceState> + Send {
        let state = self.state();
        async { state }
    }
}
