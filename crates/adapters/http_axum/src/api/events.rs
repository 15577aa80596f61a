//! Lifecycle event intake for the device host bridge.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::lifecycle::LifecycleEvent;

use crate::state::AppState;

/// Possible responses from the publish endpoint.
pub enum PublishResponse {
    /// Queued for the event pump.
    Accepted,
    /// The event pump has stopped.
    Unavailable,
}

impl IntoResponse for PublishResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}

/// `POST /api/events`
///
/// Events are processed asynchronously, in arrival order.
pub async fn publish<S, D>(
    State(state): State<AppState<S, D>>,
    Json(event): Json<LifecycleEvent>,
) -> PublishResponse
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    let kind = event.kind();
    match state.events.send(event).await {
        Ok(()) => {
            tracing::debug!(event = kind, "lifecycle event accepted");
            PublishResponse::Accepted
        }
        Err(_) => {
            tracing::warn!(event = kind, "event pump closed, dropping lifecycle event");
            PublishResponse::Unavailable
        }
    }
}
