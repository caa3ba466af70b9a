//! API error type and its JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::RelayError;
use serde::Serialize;

/// Errors a relay route can end with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The upstream feed could not be fetched.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// JSON error body: `{"status": <int>, "error": <string>}`.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    status: u16,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            status: status.as_u16(),
            error: self.to_string(),
        };
        tracing::error!(status = body.status, error = %body.error, "relay request failed");

        (status, Json(body)).into_response()
    }
}
