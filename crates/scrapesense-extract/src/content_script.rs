//! Content script — answers content requests for the page it runs in.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dom::PageDom;
use crate::extract::extract_page_content;
use crate::types::PageSnapshot;

/// Messages the content script understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentRequest {
    GetPageContent {
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "requestId")]
        request_id: Option<String>,
    },
    OpenChatPanel,
}

/// Tagged extraction outcome sent back to the requester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ContentResponse {
    Success {
        content: PageSnapshot,
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "requestId")]
        request_id: Option<String>,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "requestId")]
        request_id: Option<String>,
    },
}

impl ContentResponse {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Success { request_id, .. } | Self::Error { request_id, .. } => {
                request_id.as_deref()
            }
        }
    }

    /// The snapshot, if extraction succeeded.
    pub fn into_snapshot(self) -> Option<PageSnapshot> {
        match self {
            Self::Success { content, .. } => Some(content),
            Self::Error { .. } => None,
        }
    }
}

/// Message handler bound to one page.
pub struct ContentScript<D: PageDom> {
    page: D,
    panel_requested: AtomicBool,
}

impl<D: PageDom> ContentScript<D> {
    pub fn new(page: D) -> Self {
        Self {
            page,
            panel_requested: AtomicBool::new(false),
        }
    }

    /// Handle one raw message. Unrecognized kinds get no response.
    pub fn handle_message(&self, message: &serde_json::Value) -> Option<ContentResponse> {
        let request: ContentRequest = match serde_json::from_value(message.clone()) {
            Ok(r) => r,
            Err(_) => {
                debug!("Ignoring unsupported message: {}", message);
                return None;
            }
        };

        match request {
            ContentRequest::GetPageContent { request_id } => Some(self.respond(request_id)),
            ContentRequest::OpenChatPanel => {
                self.panel_requested.store(true, Ordering::SeqCst);
                info!("Chat panel requested");
                None
            }
        }
    }

    /// Whether a launcher has asked for the chat panel.
    pub fn panel_requested(&self) -> bool {
        self.panel_requested.load(Ordering::SeqCst)
    }

    fn respond(&self, request_id: Option<String>) -> ContentResponse {
        match extract_page_content(&self.page) {
            Ok(content) => ContentResponse::Success {
                content,
                request_id,
            },
            Err(e) => {
                warn!("Page extraction failed: {}", e);
                ContentResponse::Error {
                    message: e.to_string(),
                    request_id,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlPage;
    use serde_json::json;

    fn script(source: &str) -> ContentScript<HtmlPage> {
        ContentScript::new(HtmlPage::parse("https://example.com/a", source))
    }

    #[test]
    fn test_get_page_content_success() {
        let cs = script("<title>A</title><p>text</p>");
        let response = cs
            .handle_message(&json!({"type": "GET_PAGE_CONTENT"}))
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["content"]["title"], "A");
        assert!(json.get("requestId").is_none());
    }

    #[test]
    fn test_request_id_is_echoed() {
        let cs = script("<title>A</title>");
        let response = cs
            .handle_message(&json!({"type": "GET_PAGE_CONTENT", "requestId": "r-1"}))
            .unwrap();
        assert_eq!(response.request_id(), Some("r-1"));
    }

    #[test]
    fn test_extraction_failure_is_tagged_error() {
        let cs = script("<html><head></head><frameset></frameset></html>");
        let response = cs
            .handle_message(&json!({"type": "GET_PAGE_CONTENT"}))
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "document has no body element");
        assert!(json.get("content").is_none());
        assert!(response.into_snapshot().is_none());
    }

    #[test]
    fn test_unknown_kind_is_ignored() {
        let cs = script("<p>x</p>");
        assert!(cs.handle_message(&json!({"type": "SOMETHING_ELSE"})).is_none());
        assert!(cs.handle_message(&json!({"no": "type"})).is_none());
    }

    #[test]
    fn test_open_chat_panel_is_fire_and_forget() {
        let cs = script("<p>x</p>");
        assert!(!cs.panel_requested());
        assert!(cs.handle_message(&json!({"type": "OPEN_CHAT_PANEL"})).is_none());
        assert!(cs.panel_requested());
    }
}
