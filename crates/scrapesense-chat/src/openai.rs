//! OpenAI-compatible chat completions provider.
//!
//! Works against any endpoint that speaks the `/chat/completions` format
//! (OpenAI, Groq, local gateways). Non-streaming: the whole reply is
//! returned at once.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error};

use crate::provider::{AssistantProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are ScrapeSense, a web assistant. \
Answer the user's question using the page context below. \
If the context doesn't contain the answer, say so.";

pub struct OpenAiCompatProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiCompatProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(&self, query: &str, context: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": format!("{}\n\n{}", SYSTEM_PROMPT, context)},
                {"role": "user", "content": query},
            ],
            "temperature": 0.7,
            "stream": false,
        })
    }
}

#[async_trait]
impl AssistantProvider for OpenAiCompatProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn respond(&self, query: &str, context: &str) -> Result<String, ProviderError> {
        let url = self.endpoint();
        debug!("Requesting completion from {} with model {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(query, context))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout.as_secs())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Completion API error {}: {}", status, message);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        extract_reply(&body)
    }
}

fn extract_reply(body: &serde_json::Value) -> Result<String, ProviderError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| ProviderError::InvalidResponse("missing choices[0].message.content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let p = OpenAiCompatProvider::new("https://api.groq.com/openai/v1/", "m", "k");
        assert_eq!(p.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
    }

    #[test]
    fn test_request_body_carries_context() {
        let p = OpenAiCompatProvider::new(DEFAULT_BASE_URL, DEFAULT_MODEL, "k");
        let body = p.request_body("what is this?", "Current page: Docs");
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .ends_with("Current page: Docs"));
        assert_eq!(body["messages"][1]["content"], "what is this?");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_extract_reply() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "42"}}]});
        assert_eq!(extract_reply(&body).unwrap(), "42");

        let err = extract_reply(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let p = OpenAiCompatProvider::new("http://127.0.0.1:9", "m", "k")
            .with_timeout(Duration::from_secs(2));
        let err = p.respond("q", "c").await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Network(_) | ProviderError::Timeout(_)
        ));
    }
}
