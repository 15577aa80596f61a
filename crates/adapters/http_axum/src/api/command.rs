//! Script command endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::command::ScriptCommand;

use crate::error::ApiError;
use crate::state::AppState;

pub enum CommandResponse {
    NoContent,
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/command` with `{"command": "cancel_queue" | "enable" | "disable", "index": n}`
pub async fn run<S, D>(
    State(state): State<AppState<S, D>>,
    Json(body): Json<Value>,
) -> Result<CommandResponse, ApiError>
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    let command = ScriptCommand::from_request(&body)?;
    state.end_scripts.lock().await.command(command).await?;
    Ok(CommandResponse::NoContent)
}
