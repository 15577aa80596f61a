//! In-process notification bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use endscripts_domain::error::EndScriptsError;
use endscripts_domain::notification::{Notification, PluginMessage};
use endscripts_domain::script::Script;

use crate::ports::Notifier;

/// In-process notifier using a tokio [`broadcast`] channel.
///
/// Every notification and script list broadcast becomes a [`PluginMessage`].
/// Publishing succeeds even when nobody is listening (the message is
/// simply dropped).
pub struct InProcessNotifier {
    sender: broadcast::Sender<PluginMessage>,
}

impl InProcessNotifier {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to messages on this bus.
    ///
    /// Returns a receiver that will get all messages published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PluginMessage> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, message: PluginMessage) {
        // send only fails without receivers
        let _ = self.sender.send(message);
    }
}

impl Notifier for InProcessNotifier {
    fn notify(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        self.publish(PluginMessage::Notification(notification));
        async { Ok(()) }
    }

    fn broadcast(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        self.publish(PluginMessage::Scripts {
            scripts: scripts.to_vec(),
        });
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endscripts_domain::notification::NotificationKind;

    fn script(name: &str) -> Script {
        Script::builder()
            .name(name)
            .command("M104 S0")
            .enabled(true)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_deliver_notification_to_subscriber() {
        let bus = InProcessNotifier::new(16);
        let mut rx = bus.subscribe();

        bus.notify(Notification::queued("Cool down")).await.unwrap();

        let PluginMessage::Notification(received) = rx.recv().await.unwrap() else {
            panic!("expected a notification");
        };
        assert_eq!(received.kind, NotificationKind::Success);
        assert_eq!(received.message, "Queuing script: Cool down");
    }

    #[tokio::test]
    async fn should_deliver_script_list_to_multiple_subscribers() {
        let bus = InProcessNotifier::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.broadcast(&[script("Park")]).await.unwrap();

        let expected = PluginMessage::Scripts {
            scripts: vec![script("Park")],
        };
        assert_eq!(rx1.recv().await.unwrap(), expected);
        assert_eq!(rx2.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessNotifier::new(16);
        assert!(bus.notify(Notification::running("Park")).await.is_ok());
        assert!(bus.broadcast(&[]).await.is_ok());
    }

    #[tokio::test]
    async fn should_not_deliver_messages_published_before_subscription() {
        let bus = InProcessNotifier::new(16);
        bus.broadcast(&[]).await.unwrap();

        let mut rx = bus.subscribe();
        bus.notify(Notification::cancelled("Park")).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, PluginMessage::Notification(_)));
    }
}
