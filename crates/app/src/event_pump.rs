//! Event pump — feeds lifecycle events from a channel into the aggregate.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use endscripts_domain::lifecycle::LifecycleEvent;

use crate::end_scripts::EndScripts;
use crate::ports::{Device, Notifier, ScriptSettings};

/// Drain `events` in arrival order until every sender is dropped.
///
/// `observe` sees each event before the aggregate does, so a device adapter
/// that mirrors host state is up to date when the aggregate queries it.
pub async fn run<S, D, N, F>(
    mut events: mpsc::Receiver<LifecycleEvent>,
    end_scripts: Arc<Mutex<EndScripts<S, D, N>>>,
    mut observe: F,
) where
    S: ScriptSettings + Send + Sync,
    D: Device + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    F: FnMut(&LifecycleEvent) + Send,
{
    while let Some(event) = events.recv().await {
        observe(&event);
        end_scripts.lock().await.handle_event(event).await;
    }
    tracing::debug!("lifecycle event channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemorySettings, SpyDevice, SpyNotifier};
    use endscripts_domain::lifecycle::{DeviceState, JobPayload};
    use serde_json::json;

    #[tokio::test]
    async fn should_handle_events_in_order_until_closed() {
        let device = Arc::new(SpyDevice::new(DeviceState::Printing));
        let end_scripts = EndScripts::initialize(
            Arc::new(MemorySettings::with(json!([
                {"name": "Cool down", "commands": ["M104 S0"], "enabled": true},
            ]))),
            Arc::clone(&device),
            Arc::new(SpyNotifier::default()),
        )
        .await
        .unwrap();
        let end_scripts = Arc::new(Mutex::new(end_scripts));
        let (tx, rx) = mpsc::channel(8);

        let observed_device = Arc::clone(&device);
        let pump = tokio::spawn(run(rx, Arc::clone(&end_scripts), move |event| {
            if let LifecycleEvent::StateChanged { state_id } = event {
                observed_device.set_state(state_id.clone());
            }
        }));

        tx.send(LifecycleEvent::JobCompleted(JobPayload::new("a.gcode", 60)))
            .await
            .unwrap();
        tx.send(LifecycleEvent::StateChanged {
            state_id: DeviceState::Finishing,
        })
        .await
        .unwrap();
        tx.send(LifecycleEvent::StateChanged {
            state_id: DeviceState::Operational,
        })
        .await
        .unwrap();
        drop(tx);
        pump.await.unwrap();

        assert_eq!(device.sent(), vec![vec!["M104 S0".to_string()]]);
        assert_eq!(
            end_scripts.lock().await.tracker().last_state(),
            &DeviceState::Operational
        );
    }
}
