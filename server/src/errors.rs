//! Request errors mapped to HTTP status codes.
//!
//! Every variant renders as a JSON body `{"error": "message"}`.

use ascent_core::AscentError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request payload (400).
    BadRequest(String),
    /// Unknown document (404).
    NotFound(String),
    /// Ranking failed against loaded state (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AscentError> for ApiError {
    fn from(err: AscentError) -> Self {
        tracing::error!(error = %err, "query failed");
        ApiError::Internal(err.to_string())
    }
}
