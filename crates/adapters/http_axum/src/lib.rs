//! # endscripts-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for front-ends: list and replace scripts
//!   (`/api/scripts`), run script commands (`/api/command`) and inspect the
//!   timer queue (`/api/queue`)
//! - Accept **lifecycle events** from the device host bridge
//!   (`POST /api/events`) and hand them to the event pump
//! - Stream **plugin messages** (notifications, script list broadcasts) over
//!   Server-Sent Events (`/api/events/stream`)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `endscripts-app` (for port traits and the `EndScripts`
//! aggregate) and `endscripts-domain` (for domain types used in
//! request/response mapping). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
