//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod command;
#[allow(clippy::missing_errors_doc)]
pub mod events;
pub mod queue;
#[allow(clippy::missing_errors_doc)]
pub mod scripts;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use endscripts_app::ports::{Device, ScriptSettings};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, D>() -> Router<AppState<S, D>>
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/scripts",
            get(scripts::list::<S, D>).put(scripts::replace::<S, D>),
        )
        .route("/command", post(command::run::<S, D>))
        .route("/queue", get(queue::list::<S, D>))
        .route("/events", post(events::publish::<S, D>))
        .route("/events/stream", get(sse::stream::<S, D>))
}
