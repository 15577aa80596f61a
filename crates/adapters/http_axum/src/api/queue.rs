//! Timer queue read endpoint.

use axum::Json;
use axum::extract::State;

use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::execution::PendingExecution;

use crate::state::AppState;

/// `GET /api/queue` — executions still waiting for their delay.
pub async fn list<S, D>(State(state): State<AppState<S, D>>) -> Json<Vec<PendingExecution>>
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    Json(state.end_scripts.lock().await.pending_executions())
}
