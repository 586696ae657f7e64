//! Chat and analysis routes.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use scrapesense_chat::panel::{CONTEXT_TEXT_CHARS, NO_PAGE_CONTEXT};
use scrapesense_chat::ProviderConfigUpdate;
use scrapesense_chat::types::*;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/config", get(get_config).put(update_config))
        .route("/analyze", post(analyze))
}

// ---------------------------------------------------------------
// Chat
// ---------------------------------------------------------------

/// POST /api/chat
async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body?;

    let message = req
        .message_text()
        .ok_or_else(|| ApiError::BadRequest("Message is required".into()))?;

    let context = page_context(req.page_content.as_ref());
    debug!(
        "Chat request: {} chars, {} history entries",
        message.len(),
        req.history_len()
    );

    let content = state
        .provider()
        .respond(&message, &context)
        .await
        .map_err(|e| ApiError::Failed {
            error: "Failed to process chat message",
            details: e.to_string(),
        })?;

    Ok(Json(json!({
        "success": true,
        "data": ChatReply::assistant(content),
    })))
}

// ---------------------------------------------------------------
// Analyze
// ---------------------------------------------------------------

/// POST /api/analyze
async fn analyze(
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body?;

    if !req.page_content.as_ref().is_some_and(is_truthy) {
        return Err(ApiError::BadRequest("Page content is required".into()));
    }
    if let Some(query) = req.query.as_ref().filter(|q| is_truthy(q)) {
        info!("Analysis requested with query: {}", query);
    }

    Ok(Json(json!({
        "success": true,
        "data": Analysis::placeholder(),
    })))
}

// ---------------------------------------------------------------
// Config
// ---------------------------------------------------------------

/// GET /api/chat/config
async fn get_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let active = state.provider();
    let config = state.provider_config.read();
    Json(json!(config.to_response(active.id())))
}

/// PUT /api/chat/config
///
/// Persists the update and switches to the provider it selects.
async fn update_config(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProviderConfigUpdate>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(update) = body?;

    let mut config = state.provider_config.write();
    config.apply_update(&update);
    config.save().map_err(|e| ApiError::Failed {
        error: "Failed to save config",
        details: e.to_string(),
    })?;

    let provider = config.build_provider();
    let response = config.to_response(provider.id());
    state.set_provider(provider);
    Ok(Json(json!(response)))
}

// ---------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------

/// Render whatever page content the client sent into assistant context.
fn page_context(page_content: Option<&serde_json::Value>) -> String {
    let Some(page) = page_content.filter(|p| is_truthy(p)) else {
        return NO_PAGE_CONTEXT.to_string();
    };
    if let Some(text) = page.as_str() {
        return text.to_string();
    }

    let field = |name: &str| page.get(name).and_then(|v| v.as_str()).unwrap_or_default();
    format!(
        "Current page: {}\nURL: {}\nPage content: {}",
        field("title"),
        field("url"),
        scrapesense_extract::truncate_chars(field("text"), CONTEXT_TEXT_CHARS)
    )
}
