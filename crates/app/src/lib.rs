//! # endscripts-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ScriptSettings` — load and persist the raw script list
//!   - `Device` — send command batches, query the device state
//!   - `Notifier` — status notifications and script list broadcasts
//! - Define the use-case building blocks:
//!   - `ScriptStore` — validated, in-memory script list
//!   - `TimerQueue` — cancellable deferred executions
//!   - `JobStateTracker` — decides when a completed job triggers end scripts
//!   - `ScriptRunner` — renders, dispatches or queues, and auto-resets scripts
//! - Expose the `EndScripts` aggregate that owns all of the above and serves
//!   lifecycle events and front-end commands, plus the event pump that
//!   feeds it from a channel
//! - Provide **in-process infrastructure** (notification bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `endscripts-domain` only (plus `tokio` for tasks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod end_scripts;
pub mod event_pump;
pub mod job_tracker;
pub mod notification_bus;
pub mod ports;
pub mod script_runner;
pub mod script_store;
pub mod timer_queue;

#[cfg(test)]
pub(crate) mod test_support;
