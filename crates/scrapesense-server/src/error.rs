//! API error responses.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scrapesense_core::RunMode;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Missing required input.
    BadRequest(String),
    /// The body extractor refused the request; keeps its status
    /// (400 bad JSON, 413 too large, 415 wrong content type).
    Rejected(StatusCode, String),
    /// A handler failed; `details` is the underlying cause.
    Failed { error: &'static str, details: String },
    /// A backing worker is gone.
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
            }
            ApiError::Rejected(status, reason) => {
                (status, Json(json!({ "error": reason }))).into_response()
            }
            ApiError::Failed { error: summary, details } => {
                error!("{}: {}", summary, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": summary, "details": details })),
                )
                    .into_response()
            }
            ApiError::Unavailable(reason) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": reason })),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

/// Response for a handler that panicked. Details only leave the process
/// in development mode.
pub fn panic_response(mode: RunMode, panic: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!("Server error: {}", cause);

    let message = if mode.is_development() {
        cause
    } else {
        "An error occurred".to_string()
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error", "message": message })),
    )
        .into_response()
}
