//! Notifier port — status notifications and script list broadcasts.

use std::future::Future;
use std::sync::Arc;

use endscripts_domain::error::EndScriptsError;
use endscripts_domain::notification::Notification;
use endscripts_domain::script::Script;

/// Delivers messages to whoever is watching (UI sessions, SSE clients, …).
///
/// Delivery is best effort: callers log or ignore failures and carry on.
pub trait Notifier {
    /// Emit a user-facing status notification.
    fn notify(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), EndScriptsError>> + Send;

    /// Publish the full, current script list.
    fn broadcast(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send;
}

impl<T: Notifier + Send + Sync> Notifier for Arc<T> {
    fn notify(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        (**self).notify(notification)
    }

    fn broadcast(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        (**self).broadcast(scripts)
    }
}
