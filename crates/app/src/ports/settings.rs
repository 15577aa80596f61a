//! Settings port — load and persist the raw script configuration.

use std::future::Future;
use std::sync::Arc;

use endscripts_domain::error::EndScriptsError;
use endscripts_domain::script::Script;

/// Configuration backend holding the script list.
///
/// The stored shape is owned by the backend; the core only reads it back as
/// an untyped JSON value and validates it itself.
pub trait ScriptSettings {
    /// Return the raw script list as last saved (normally a JSON array).
    fn get(&self) -> impl Future<Output = Result<serde_json::Value, EndScriptsError>> + Send;

    /// Stage a new script list. Nothing is durable until [`save`](Self::save).
    fn set(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send;

    /// Flush staged settings to durable storage.
    fn save(&self) -> impl Future<Output = Result<(), EndScriptsError>> + Send;
}

impl<T: ScriptSettings + Send + Sync> ScriptSettings for Arc<T> {
    fn get(&self) -> impl Future<Output = Result<serde_json::Value, EndScriptsError>> + Send {
        (**self).get()
    }

    fn set(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        (**self).set(scripts)
    }

    fn save(&self) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        (**self).save()
    }
}
