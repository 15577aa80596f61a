//! # endscripts-adapter-settings-json
//!
//! Settings persistence adapter backed by a single JSON document.
//!
//! ## Responsibilities
//! - Implement the `ScriptSettings` port defined in `endscripts-app::ports`
//! - Load the document at startup (a missing file means no scripts)
//! - Save atomically: write a sibling temp file, then rename it over the
//!   original
//! - Preserve keys it does not own so other tools can share the file
//!
//! ## Dependency rule
//! Depends on `endscripts-app` (for port traits) and `endscripts-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod settings;

pub use error::SettingsError;
pub use settings::JsonFileSettings;
