//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};

use endscripts_app::end_scripts::EndScripts;
use endscripts_app::notification_bus::InProcessNotifier;
use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::lifecycle::LifecycleEvent;

/// The aggregate as shared between the HTTP handlers and the event pump.
pub type SharedEndScripts<S, D> = Arc<Mutex<EndScripts<S, D, InProcessNotifier>>>;

/// Application state shared across all axum handlers.
///
/// Generic over the settings backend and the device to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers and the
/// channel sender are cloned.
pub struct AppState<S, D> {
    /// Script manager; every API call takes the lock for its duration.
    pub end_scripts: SharedEndScripts<S, D>,
    /// Notification bus, subscribed to by SSE clients.
    pub notifier: Arc<InProcessNotifier>,
    /// Intake for lifecycle events posted by the host bridge.
    pub events: mpsc::Sender<LifecycleEvent>,
    /// Flips to `true` once the server is stopping; ends open SSE streams.
    pub shutdown: watch::Receiver<bool>,
}

impl<S, D> Clone for AppState<S, D> {
    fn clone(&self) -> Self {
        Self {
            end_scripts: Arc::clone(&self.end_scripts),
            notifier: Arc::clone(&self.notifier),
            events: self.events.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<S, D> AppState<S, D>
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    pub fn new(
        end_scripts: SharedEndScripts<S, D>,
        notifier: Arc<InProcessNotifier>,
        events: mpsc::Sender<LifecycleEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            end_scripts,
            notifier,
            events,
            shutdown,
        }
    }
}
