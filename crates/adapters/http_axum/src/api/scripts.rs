//! JSON handlers for the script list.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::error::{BadRequestError, EndScriptsError};
use endscripts_domain::script::Script;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list and replace endpoints.
pub enum ScriptsResponse {
    Ok(Json<Vec<Script>>),
}

impl IntoResponse for ScriptsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/scripts`
pub async fn list<S, D>(State(state): State<AppState<S, D>>) -> ScriptsResponse
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    let scripts = state.end_scripts.lock().await.list_scripts().to_vec();
    ScriptsResponse::Ok(Json(scripts))
}

/// `PUT /api/scripts`
///
/// Accepts the raw list or a settings-shaped `{"scripts": [...]}` object.
/// Invalid entries are dropped; the response carries the stored list. An
/// object without a `scripts` key is rejected and leaves the list untouched.
pub async fn replace<S, D>(
    State(state): State<AppState<S, D>>,
    Json(body): Json<Value>,
) -> Result<ScriptsResponse, ApiError>
where
    S: ScriptSettings + Send + Sync + 'static,
    D: Device + Send + Sync + 'static,
{
    let raw = match body {
        Value::Object(mut map) => map
            .remove("scripts")
            .ok_or(EndScriptsError::from(BadRequestError::MissingScripts))?,
        other => other,
    };
    let scripts = state.end_scripts.lock().await.replace_scripts(&raw).await?;
    Ok(ScriptsResponse::Ok(Json(scripts)))
}
