//! Server-Sent Events (SSE) stream of plugin messages.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::lifecycle::LifecycleEvent;

use crate::state::AppState;

/// `GET /api/events/stream` — SSE stream of notifications and script list
/// broadcasts.
///
/// Opening a stream counts as a user session: a `user_session_started`
/// event is queued so the new client receives the current script list.
/// Each message is sent as a JSON `data:` frame tagged with its `type`
/// (`notification` or `scripts`). The stream continues until the client
/// disconnects, the notification bus is closed or the server starts shutting
/// down.
pub async fn stream<S, D>(
    State(state): State<AppState<S, D>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    let rx = state.notifier.subscribe();
    if state
        .events
        .try_send(LifecycleEvent::UserSessionStarted)
        .is_err()
    {
        tracing::warn!("event pump unavailable, new SSE client gets no script list");
    }
    let messages = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(message) => match serde_json::to_string(&message) {
            Ok(json) => Some(Some(Event::default().data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize plugin message for SSE stream");
                None
            }
        },
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some messages were dropped");
            None
        }
    });
    // `None` marks the end of the stream.
    let stopping = WatchStream::new(state.shutdown.clone())
        .filter(|stopping| *stopping)
        .map(|_| None);
    let frames = messages
        .merge(stopping)
        .take_while(Option::is_some)
        .filter_map(|frame| frame.map(Ok::<Event, Infallible>));

    Sse::new(frames).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use endscripts_app::ports::Notifier;
    use axum::response::IntoResponse;
    use endscripts_domain::notification::{Notification, PluginMessage};
    use serde_json::json;
    use tokio::sync::watch;

    #[tokio::test]
    async fn should_keep_notification_bus_subscribed_while_streaming() {
        let (state, mut events) = test_state(json!([])).await;
        let notifier = std::sync::Arc::clone(&state.notifier);
        let mut rx = notifier.subscribe();

        let _sse_response = stream(State(state)).await;
        assert_eq!(notifier.receiver_count(), 2);
        assert_eq!(events.recv().await, Some(LifecycleEvent::UserSessionStarted));

        notifier.notify(Notification::running("Park")).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, PluginMessage::Notification(n) if n.message == "Running script: Park"));
    }

    #[tokio::test]
    async fn should_end_stream_when_server_shuts_down() {
        let (mut state, _events) = test_state(json!([])).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        state.shutdown = shutdown_rx;

        let response = stream(State(state)).await.into_response();
        shutdown_tx.send(true).unwrap();

        let body = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            axum::body::to_bytes(response.into_body(), usize::MAX),
        )
        .await
        .expect("stream should end after shutdown")
        .unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("data:"));
    }
}
