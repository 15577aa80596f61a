//! Timer queue — deferred script executions with cancellation.
//!
//! Each queued execution is an independent tokio task that sleeps for the
//! script's delay and then dispatches its already-rendered commands. The
//! queue only keeps the task handles plus a oneshot cancel signal per entry;
//! tasks hold `Arc`s of the device and notifier, never the queue itself.
//!
//! Cancellation is cooperative: it wins only while the task is still
//! waiting. Once the delay has elapsed the dispatch runs to completion.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use endscripts_domain::execution::PendingExecution;
use endscripts_domain::id::ExecutionId;
use endscripts_domain::notification::Notification;
use endscripts_domain::time::{Timestamp, now};

use crate::ports::{Device, Notifier};
use crate::script_runner::run_script;

struct QueuedExecution {
    id: ExecutionId,
    name: String,
    commands: Vec<String>,
    due_at: Timestamp,
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl QueuedExecution {
    fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Registry of deferred executions, in insertion order.
pub struct TimerQueue<D, N> {
    device: Arc<D>,
    notifier: Arc<N>,
    entries: Vec<QueuedExecution>,
}

impl<D, N> TimerQueue<D, N>
where
    D: Device + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(device: Arc<D>, notifier: Arc<N>) -> Self {
        Self {
            device,
            notifier,
            entries: Vec::new(),
        }
    }

    /// Schedule `commands` to be dispatched after `delay`.
    ///
    /// The "queued" notification is emitted before this returns.
    pub async fn enqueue(&mut self, delay: Duration, name: &str, commands: Vec<String>) -> ExecutionId {
        if let Err(err) = self.notifier.notify(Notification::queued(name)).await {
            tracing::warn!(script = %name, error = %err, "failed to send queued notification");
        }

        let id = ExecutionId::new();
        let due_at = now() + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
        let (cancel, cancelled) = oneshot::channel::<()>();

        let device = Arc::clone(&self.device);
        let notifier = Arc::clone(&self.notifier);
        let task_name = name.to_owned();
        let task_commands = commands.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    run_script(&*device, &*notifier, &task_name, task_commands).await;
                }
                _ = cancelled => {
                    tracing::debug!(script = %task_name, "queued script cancelled");
                }
            }
        });

        tracing::info!(script = %name, delay_secs = delay.as_secs(), %id, "script queued");
        self.entries.push(QueuedExecution {
            id,
            name: name.to_owned(),
            commands,
            due_at,
            cancel,
            handle,
        });
        id
    }

    /// Forget entries whose task has already finished.
    pub fn cleanup(&mut self) {
        self.entries.retain(QueuedExecution::is_pending);
    }

    /// Cancel every pending execution, announcing each one with a warning
    /// notification. The queue is empty afterwards.
    ///
    /// Returns the number of cancel requests sent.
    pub async fn cancel_all(&mut self) -> usize {
        self.drain(true).await
    }

    /// Same as [`cancel_all`](Self::cancel_all) without notifications.
    pub async fn abort_all(&mut self) -> usize {
        self.drain(false).await
    }

    async fn drain(&mut self, announce: bool) -> usize {
        let mut requested = 0;
        while let Some(entry) = self.entries.pop() {
            if !entry.is_pending() {
                continue;
            }
            if announce
                && let Err(err) = self.notifier.notify(Notification::cancelled(&entry.name)).await
            {
                tracing::warn!(script = %entry.name, error = %err, "failed to send cancel notification");
            }
            tracing::info!(script = %entry.name, id = %entry.id, "cancelling queued script");
            // the task may have finished in the meantime
            let _ = entry.cancel.send(());
            requested += 1;
        }
        requested
    }

    /// Read model of the executions still waiting or running.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingExecution> {
        let at = now();
        self.entries
            .iter()
            .filter(|entry| entry.is_pending())
            .map(|entry| {
                PendingExecution::new(
                    entry.id,
                    entry.name.clone(),
                    entry.commands.clone(),
                    entry.due_at,
                    at,
                )
            })
            .collect()
    }

    /// Number of tracked entries, finished ones included until the next cleanup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
