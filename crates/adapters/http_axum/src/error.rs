//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use endscripts_domain::error::EndScriptsError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`EndScriptsError`] to an HTTP response with appropriate status code.
pub struct ApiError(EndScriptsError);

impl From<EndScriptsError> for ApiError {
    fn from(err: EndScriptsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            EndScriptsError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            EndScriptsError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            EndScriptsError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            EndScriptsError::Device(err) => {
                tracing::error!(error = %err, "device error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
