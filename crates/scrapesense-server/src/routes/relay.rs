//! Relay bridge — lets the extension talk to a relay hosted by the backend.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::error::ApiError;
use crate::state::AppState;
use scrapesense_relay::MessageSender;

/// Header carrying the sender's page-instance id.
pub const TAB_ID_HEADER: &str = "x-tab-id";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/relay/messages", post(send_message))
        .route("/relay/tabs", get(list_tabs))
        .route("/relay/tabs/{tab_id}", delete(close_tab))
}

/// POST /api/relay/messages
///
/// Answers 204 when the relay ignores the message kind.
async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(message) = body?;
    let sender = sender_from_headers(&headers)?;

    let response = state
        .relay
        .send(sender, message)
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(match response {
        Some(r) => Json(r).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET /api/relay/tabs
async fn list_tabs(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let pages = state
        .relay
        .list_pages()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;
    Ok(Json(serde_json::json!({ "pages": pages })))
}

/// DELETE /api/relay/tabs/{tab_id}
async fn close_tab(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .relay
        .page_closed(tab_id)
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

fn sender_from_headers(headers: &HeaderMap) -> Result<MessageSender, ApiError> {
    let Some(raw) = headers.get(TAB_ID_HEADER) else {
        return Ok(MessageSender::default());
    };
    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map(MessageSender::tab)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {} header", TAB_ID_HEADER)))
}
