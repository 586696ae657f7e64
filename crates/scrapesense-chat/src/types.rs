//! Chat types matching the backend API and the chat panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One exchange in the chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Incoming `POST /api/chat` body. Fields are loose JSON so that any
/// shape the client sends is accepted and only a missing message is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default, rename = "pageContent")]
    pub page_content: Option<serde_json::Value>,
    #[serde(default, rename = "conversationHistory")]
    pub conversation_history: Option<serde_json::Value>,
}

impl ChatRequest {
    /// The message as text, or `None` when it is absent or falsy.
    /// Non-string values are rendered as JSON.
    pub fn message_text(&self) -> Option<String> {
        let message = self.message.as_ref().filter(|m| is_truthy(m))?;
        Some(match message.as_str() {
            Some(text) => text.to_string(),
            None => message.to_string(),
        })
    }

    /// Number of history entries; anything but an array counts as none.
    pub fn history_len(&self) -> usize {
        self.conversation_history
            .as_ref()
            .and_then(|h| h.as_array())
            .map_or(0, Vec::len)
    }
}

/// Token accounting reported with each reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(rename = "promptTokens")]
    pub prompt_tokens: u64,
    #[serde(rename = "completionTokens")]
    pub completion_tokens: u64,
}

/// Assistant reply returned in `data` of a chat response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub id: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub usage: Usage,
}

impl ChatReply {
    pub fn assistant(content: String) -> Self {
        let now = Utc::now();
        Self {
            id: format!("msg-{}", now.timestamp_millis()),
            role: Role::Assistant,
            content,
            timestamp: now,
            usage: Usage::default(),
        }
    }
}

/// Incoming `POST /api/analyze` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, rename = "pageContent")]
    pub page_content: Option<serde_json::Value>,
    #[serde(default)]
    pub query: Option<serde_json::Value>,
}

/// Page analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<String>,
    pub entities: Vec<String>,
    pub sentiment: String,
}

impl Analysis {
    /// Fixed analysis returned until a real analyzer exists.
    pub fn placeholder() -> Self {
        Self {
            summary: "Page analysis placeholder".into(),
            key_points: vec!["Point 1".into(), "Point 2".into(), "Point 3".into()],
            entities: Vec::new(),
            sentiment: "neutral".into(),
        }
    }
}

/// Whether a JSON value counts as present (not null, false, 0 or "").
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_tolerates_missing_fields() {
        let req: ChatRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.message_text().is_none());
        assert!(req.page_content.is_none());
        assert_eq!(req.history_len(), 0);

        let req: ChatRequest = serde_json::from_value(json!({
            "message": "hi",
            "pageContent": {"title": "T"},
            "conversationHistory": [{"type": "user", "content": "earlier"}],
        }))
        .unwrap();
        assert_eq!(req.message_text().as_deref(), Some("hi"));
        assert_eq!(req.history_len(), 1);
    }

    #[test]
    fn test_chat_request_accepts_loose_shapes() {
        let req: ChatRequest =
            serde_json::from_value(json!({"message": "hi", "conversationHistory": null})).unwrap();
        assert_eq!(req.message_text().as_deref(), Some("hi"));
        assert_eq!(req.history_len(), 0);

        let req: ChatRequest = serde_json::from_value(json!({"message": 5})).unwrap();
        assert_eq!(req.message_text().as_deref(), Some("5"));

        for falsy in [json!(""), json!(0), json!(false), json!(null)] {
            let req: ChatRequest = serde_json::from_value(json!({"message": falsy})).unwrap();
            assert!(req.message_text().is_none());
        }
    }

    #[test]
    fn test_reply_shape() {
        let reply = ChatReply::assistant("hello".into());
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json["id"].as_str().unwrap().starts_with("msg-"));
        assert_eq!(json["type"], "assistant");
        assert_eq!(json["usage"]["promptTokens"], 0);
        assert_eq!(json["usage"]["completionTokens"], 0);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("text")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }
}
