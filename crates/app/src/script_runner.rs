//! Script runner — fires every enabled end script for a completed job.

use std::sync::Arc;

use endscripts_domain::error::EndScriptsError;
use endscripts_domain::lifecycle::JobPayload;
use endscripts_domain::notification::Notification;
use endscripts_domain::script::Script;
use endscripts_domain::template::format_commands;

use crate::ports::{Device, Notifier, ScriptSettings};
use crate::script_store::ScriptStore;
use crate::timer_queue::TimerQueue;

/// Outcome of one trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireReport {
    /// Scripts dispatched before the trigger returned.
    pub dispatched: usize,
    /// Scripts handed to the timer queue.
    pub queued: usize,
    /// Scripts whose commands could not be rendered.
    pub failed: usize,
}

/// Dispatch one script's rendered commands: "running" notification, then send.
///
/// Failures are logged; nothing is propagated to the caller.
pub(crate) async fn run_script<D: Device, N: Notifier>(
    device: &D,
    notifier: &N,
    name: &str,
    commands: Vec<String>,
) {
    if let Err(err) = notifier.notify(Notification::running(name)).await {
        tracing::warn!(script = %name, error = %err, "failed to send running notification");
    }
    tracing::info!(script = %name, commands = commands.len(), "running script");
    if let Err(err) = device.send(commands).await {
        tracing::error!(script = %name, error = %err, "failed to dispatch script commands");
    }
}

/// Renders, dispatches and persists scripts on behalf of the aggregate.
pub struct ScriptRunner<S, D, N> {
    settings: S,
    device: Arc<D>,
    notifier: Arc<N>,
}

impl<S, D, N> ScriptRunner<S, D, N>
where
    S: ScriptSettings + Send + Sync,
    D: Device + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(settings: S, device: Arc<D>, notifier: Arc<N>) -> Self {
        Self {
            settings,
            device,
            notifier,
        }
    }

    #[must_use]
    pub fn device(&self) -> &Arc<D> {
        &self.device
    }

    /// Fire every enabled script, in order, for `job`.
    ///
    /// Immediate scripts are dispatched before this returns; delayed ones go
    /// through `queue`. Auto-reset scripts are disabled once fired, even when
    /// their commands fail to render. The resulting list is persisted and
    /// broadcast exactly once.
    #[tracing::instrument(skip_all, fields(file = job.name.as_deref().unwrap_or_default()))]
    pub async fn fire_end_scripts(
        &self,
        store: &mut ScriptStore,
        queue: &mut TimerQueue<D, N>,
        job: &JobPayload,
    ) -> FireReport {
        let mut report = FireReport::default();

        for script in store.scripts_mut().iter_mut().filter(|script| script.enabled) {
            match format_commands(&script.commands, job) {
                Ok(commands) if script.is_deferred() => {
                    queue
                        .enqueue(script.delay_duration(), &script.name, commands)
                        .await;
                    report.queued += 1;
                }
                Ok(commands) => {
                    run_script(&*self.device, &*self.notifier, &script.name, commands).await;
                    report.dispatched += 1;
                }
                Err(err) => {
                    tracing::error!(script = %script.name, error = %err, "invalid script commands");
                    if let Err(err) = self
                        .notifier
                        .notify(Notification::invalid_commands(&script.name))
                        .await
                    {
                        tracing::warn!(script = %script.name, error = %err, "failed to send error notification");
                    }
                    report.failed += 1;
                }
            }

            if script.auto_reset {
                script.enabled = false;
            }
        }

        if let Err(err) = self.persist(store.scripts()).await {
            tracing::error!(error = %err, "failed to persist scripts after trigger");
        }
        self.broadcast(store.scripts()).await;

        tracing::info!(
            dispatched = report.dispatched,
            queued = report.queued,
            failed = report.failed,
            "end scripts fired"
        );
        report
    }

    /// Stage and save the script list.
    ///
    /// # Errors
    ///
    /// Returns the settings backend error.
    pub async fn persist(&self, scripts: &[Script]) -> Result<(), EndScriptsError> {
        self.settings.set(scripts).await?;
        self.settings.save().await
    }

    /// Publish the script list to observers; failures are logged.
    pub async fn broadcast(&self, scripts: &[Script]) {
        if let Err(err) = self.notifier.broadcast(scripts).await {
            tracing::warn!(error = %err, "failed to broadcast scripts");
        }
    }
}
