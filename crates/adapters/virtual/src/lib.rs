//! # endscripts-adapter-virtual
//!
//! Virtual printer that stands in for a real device host.
//!
//! | Behaviour | Detail |
//! |-----------|--------|
//! | Command dispatch | Every batch is recorded; each command is logged at `INFO` |
//! | State queries | Answers with the last state it observed |
//! | Lifecycle | Follows `state_changed` events; `disconnected` puts it `OFFLINE` |
//! | Offline | Rejects dispatches with [`PrinterError::Offline`] |
//!
//! ## Dependency rule
//!
//! Depends on `endscripts-app` (port traits) and `endscripts-domain` only.

mod printer;

pub use printer::{PrinterError, VirtualPrinter};
