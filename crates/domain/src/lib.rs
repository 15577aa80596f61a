//! # endscripts-domain
//!
//! Pure domain model for the end-of-job script system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Scripts** (named command templates fired when a job ends)
//!   and the schema validation that turns raw configuration into them
//! - Render command **templates** against job-completion data
//! - Define **lifecycle events** emitted by the device host and the
//!   **device states** they carry
//! - Define **notifications** and the messages broadcast to observers
//! - Parse **script commands** received from front-ends
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod execution;
pub mod lifecycle;
pub mod notification;
pub mod script;
pub mod template;
