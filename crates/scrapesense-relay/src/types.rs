//! Relay types — matching the extension's message payloads.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Sentinel id for senders that carry no page instance.
pub const UNKNOWN_PAGE: &str = "unknown";

/// Acknowledgement returned for `STORE_PAGE_CONTENT`.
pub const STORED_STATUS: &str = "stored";

/// Fixed reply for `QUERY_AI` until a real assistant is wired in.
pub const QUERY_PLACEHOLDER: &str = "AI response will be implemented here";

/// Page-instance identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Tab(i64),
    Unknown,
}

impl PageId {
    pub fn from_tab(tab_id: Option<i64>) -> Self {
        tab_id.map(Self::Tab).unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tab(id) => write!(f, "{}", id),
            Self::Unknown => write!(f, "{}", UNKNOWN_PAGE),
        }
    }
}

impl Serialize for PageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Tab(id) => serializer.serialize_i64(*id),
            Self::Unknown => serializer.serialize_str(UNKNOWN_PAGE),
        }
    }
}

/// Who sent a message. The page id is implicit in the channel, never in the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageSender {
    pub tab_id: Option<i64>,
}

impl MessageSender {
    pub fn tab(tab_id: i64) -> Self {
        Self {
            tab_id: Some(tab_id),
        }
    }

    pub fn page_id(&self) -> PageId {
        PageId::from_tab(self.tab_id)
    }
}

/// Messages the relay understands. Anything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayRequest {
    StorePageContent {
        #[serde(default)]
        content: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    GetPageContent,
    QueryAi {
        #[serde(default)]
        query: String,
    },
}

/// Latest capture for one page instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPage {
    pub content: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Capture time, Unix epoch milliseconds.
    #[serde(rename = "timestamp")]
    pub captured_at: i64,
}

/// Relay reply. Serializes to the bare JSON shapes the extension expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Stored { status: &'static str },
    Content { content: Option<StoredPage> },
    Query { response: String },
}

/// Listing entry for tracked pages.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    #[serde(rename = "pageId")]
    pub page_id: PageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "timestamp")]
    pub captured_at: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("relay channel closed")]
    Closed,

    #[error("no response after {0} ms")]
    Timeout(u64),

    #[error("failed to send request: {0}")]
    Send(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_id_fallback() {
        assert_eq!(MessageSender::default().page_id(), PageId::Unknown);
        assert_eq!(MessageSender::tab(7).page_id(), PageId::Tab(7));
        assert_eq!(serde_json::to_value(PageId::Unknown).unwrap(), json!("unknown"));
        assert_eq!(serde_json::to_value(PageId::Tab(7)).unwrap(), json!(7));
    }

    #[test]
    fn test_request_kinds_parse() {
        let req: RelayRequest = serde_json::from_value(json!({
            "type": "STORE_PAGE_CONTENT",
            "content": {"title": "A"},
            "url": "https://a.example",
            "title": "A",
        }))
        .unwrap();
        assert!(matches!(req, RelayRequest::StorePageContent { .. }));

        let req: RelayRequest = serde_json::from_value(json!({"type": "QUERY_AI", "query": "hi"})).unwrap();
        assert!(matches!(req, RelayRequest::QueryAi { ref query } if query == "hi"));

        assert!(serde_json::from_value::<RelayRequest>(json!({"type": "PING"})).is_err());
    }

    #[test]
    fn test_response_shapes() {
        let stored = RelayResponse::Stored { status: STORED_STATUS };
        assert_eq!(serde_json::to_value(&stored).unwrap(), json!({"status": "stored"}));

        let empty = RelayResponse::Content { content: None };
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({"content": null}));

        let page = RelayResponse::Content {
            content: Some(StoredPage {
                content: json!({"text": "x"}),
                url: Some("https://a.example".into()),
                title: None,
                captured_at: 1_700_000_000_000,
            }),
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["content"]["timestamp"], 1_700_000_000_000i64);
        assert!(value["content"].get("title").is_none());
    }
}
