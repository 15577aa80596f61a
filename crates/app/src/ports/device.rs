//! Device port — the command interface and state query of the controlled device.

use std::future::Future;
use std::sync::Arc;

use endscripts_domain::error::EndScriptsError;
use endscripts_domain::lifecycle::DeviceState;

/// The device end scripts send commands to.
///
/// Deferred executions dispatch from their own tasks while the event loop
/// may dispatch at the same time, so implementations must tolerate
/// concurrent calls. No timeout is applied to [`send`](Self::send).
pub trait Device {
    /// Send a batch of rendered commands, in order.
    fn send(&self, commands: Vec<String>) -> impl Future<Output = Result<(), EndScriptsError>> + Send;

    /// Report the device's current state.
    fn current_state(&self) -> impl Future<Output = DeviceState> + Send;
}

impl<T: Device + Send + Sync> Device for Arc<T> {
    fn send(&self, commands: Vec<String>) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        (**self).send(commands)
    }

    fn current_state(&self) -> impl Future<Output = DeviceState> + Send {
        (**self).current_state()
    }
}
