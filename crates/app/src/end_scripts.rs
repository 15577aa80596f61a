//! `EndScripts` — the aggregate that owns the script list, the timer queue
//! and the job state tracker.
//!
//! One instance serves both lifecycle events from the device host and
//! commands from front-ends. Callers serialize access (the binary keeps it
//! behind a `tokio::sync::Mutex`); only deferred executions run outside it.

use std::sync::Arc;

use serde_json::Value;

use endscripts_domain::command::ScriptCommand;
use endscripts_domain::error::EndScriptsError;
use endscripts_domain::execution::PendingExecution;
use endscripts_domain::lifecycle::{JobPayload, LifecycleEvent};
use endscripts_domain::script::Script;

use crate::job_tracker::JobStateTracker;
use crate::ports::{Device, Notifier, ScriptSettings};
use crate::script_runner::{FireReport, ScriptRunner};
use crate::script_store::ScriptStore;
use crate::timer_queue::TimerQueue;

/// End-of-job script manager.
pub struct EndScripts<S, D, N> {
    store: ScriptStore,
    queue: TimerQueue<D, N>,
    tracker: JobStateTracker,
    runner: ScriptRunner<S, D, N>,
}

impl<S, D, N> EndScripts<S, D, N>
where
    S: ScriptSettings + Send + Sync,
    D: Device + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    /// Load scripts in reset mode and capture the initial device state.
    ///
    /// # Errors
    ///
    /// Returns the settings backend error when the script list cannot be read.
    #[tracing::instrument(skip_all)]
    pub async fn initialize(settings: S, device: Arc<D>, notifier: Arc<N>) -> Result<Self, EndScriptsError> {
        let raw = settings.get().await?;
        let store = ScriptStore::load(&raw, true);
        let initial = device.current_state().await;
        tracing::info!(scripts = store.len(), state = %initial, "end scripts initialized");

        Ok(Self {
            store,
            queue: TimerQueue::new(Arc::clone(&device), Arc::clone(&notifier)),
            tracker: JobStateTracker::new(initial),
            runner: ScriptRunner::new(settings, device, notifier),
        })
    }

    #[must_use]
    pub fn list_scripts(&self) -> &[Script] {
        self.store.scripts()
    }

    #[must_use]
    pub fn pending_executions(&self) -> Vec<PendingExecution> {
        self.queue.pending()
    }

    #[must_use]
    pub fn tracker(&self) -> &JobStateTracker {
        &self.tracker
    }

    /// Replace the whole script list from a raw settings value.
    ///
    /// Entries are validated without reset, so `enabled` flags are kept as
    /// given. The validated list is persisted and broadcast.
    ///
    /// # Errors
    ///
    /// Returns the settings backend error; the in-memory list is already
    /// replaced at that point.
    #[tracing::instrument(skip_all)]
    pub async fn replace_scripts(&mut self, raw: &Value) -> Result<Vec<Script>, EndScriptsError> {
        let scripts = self.store.replace(raw).to_vec();
        tracing::info!(scripts = scripts.len(), "script list replaced");
        self.runner.persist(&scripts).await?;
        self.runner.broadcast(&scripts).await;
        Ok(scripts)
    }

    /// Execute a front-end command.
    ///
    /// `cancel_queue` only touches the timer queue; `enable` / `disable`
    /// persist and broadcast the updated list.
    ///
    /// # Errors
    ///
    /// Returns [`EndScriptsError::BadRequest`] for an out-of-range index and
    /// the settings backend error when persisting fails.
    #[tracing::instrument(skip(self))]
    pub async fn command(&mut self, command: ScriptCommand) -> Result<(), EndScriptsError> {
        match command {
            ScriptCommand::CancelQueue => {
                let cancelled = self.queue.cancel_all().await;
                tracing::info!(cancelled, "queue cancelled");
                Ok(())
            }
            ScriptCommand::Enable { index } => self.set_enabled(index, true).await,
            ScriptCommand::Disable { index } => self.set_enabled(index, false).await,
        }
    }

    async fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), EndScriptsError> {
        self.store.set_enabled(index, enabled)?;
        self.runner.persist(self.store.scripts()).await?;
        self.runner.broadcast(self.store.scripts()).await;
        Ok(())
    }

    /// React to a lifecycle event from the device host.
    ///
    /// Returns the trigger report when the event fired end scripts.
    #[tracing::instrument(skip_all, fields(event = event.kind()))]
    pub async fn handle_event(&mut self, event: LifecycleEvent) -> Option<FireReport> {
        if let LifecycleEvent::Shutdown | LifecycleEvent::Disconnected = event {
            let aborted = self.queue.abort_all().await;
            tracing::info!(aborted, "queued scripts aborted");
            return None;
        }

        self.queue.cleanup();

        let report = match event {
            LifecycleEvent::StateChanged { state_id } => {
                tracing::debug!(state = %state_id, "device state changed");
                let job = self.tracker.on_state_changed(state_id);
                return self.fire(job).await;
            }
            LifecycleEvent::JobCompleted(payload) => {
                let current = self.runner.device().current_state().await;
                let job = self.tracker.on_job_completed(payload, &current);
                if job.is_none() {
                    tracing::debug!(state = %current, "job completed while busy, waiting for idle");
                }
                self.fire(job).await
            }
            LifecycleEvent::JobStarted
            | LifecycleEvent::JobCancelling
            | LifecycleEvent::JobCancelled
            | LifecycleEvent::JobFailed => {
                if self.tracker.clear_pending() {
                    tracing::debug!("pending job discarded");
                }
                None
            }
            LifecycleEvent::UserSessionStarted => {
                self.runner.broadcast(self.store.scripts()).await;
                None
            }
            // returned early above
            LifecycleEvent::Shutdown | LifecycleEvent::Disconnected => None,
        };

        let state = self.runner.device().current_state().await;
        self.tracker.record(state);
        report
    }

    async fn fire(&mut self, job: Option<JobPayload>) -> Option<FireReport> {
        let job = job?;
        Some(
            self.runner
                .fire_end_scripts(&mut self.store, &mut self.queue, &job)
                .await,
        )
    }
}
