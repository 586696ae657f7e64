//! Assistant provider boundary and the placeholder providers.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Delay before the simulated assistant answers.
pub const SIMULATED_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Something that can answer a question about a page.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Provider identifier, used in logs and status output.
    fn id(&self) -> &str;

    /// Answer `query` given a textual page `context`.
    async fn respond(&self, query: &str, context: &str) -> Result<String, ProviderError>;
}

/// Backend placeholder: echoes the query back.
#[derive(Debug, Default, Clone)]
pub struct EchoProvider;

#[async_trait]
impl AssistantProvider for EchoProvider {
    fn id(&self) -> &str {
        "echo"
    }

    async fn respond(&self, query: &str, _context: &str) -> Result<String, ProviderError> {
        Ok(format!(
            "Echo: {}. [This is a placeholder response. Connect to your AI API for real answers.]",
            query
        ))
    }
}

/// Chat-panel placeholder: canned replies keyed on the query, after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    delay: Duration,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self::with_delay(SIMULATED_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn canned_reply(query: &str, context: &str) -> String {
        let query = query.to_lowercase();
        if query.contains("summary") {
            "Here's a summary of the page content... [This is a placeholder response. \
             Connect to your AI agent to get real responses.]"
                .to_string()
        } else if query.contains("help") {
            "I can help you by:\n\
             - Summarizing page content\n\
             - Answering questions about what's on the page\n\
             - Extracting specific information\n\
             - Explaining complex topics\n\n\
             What would you like to know about this page?"
                .to_string()
        } else {
            let headline = context.split('\n').next().unwrap_or_default();
            format!(
                "Based on the current page \"{}\", here's my response to your question:\n\n\
                 [This is a placeholder. Connect to your AI agent for real answers.]",
                headline
            )
        }
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantProvider for SimulatedProvider {
    fn id(&self) -> &str {
        "simulated"
    }

    async fn respond(&self, query: &str, context: &str) -> Result<String, ProviderError> {
        debug!("Simulating reply in {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(Self::canned_reply(query, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_contains_query() {
        let reply = EchoProvider.respond("hi", "").await.unwrap();
        assert!(reply.contains("Echo: hi"));
    }

    #[tokio::test]
    async fn test_simulated_keywords() {
        let p = SimulatedProvider::with_delay(Duration::ZERO);

        let reply = p.respond("Give me a SUMMARY", "").await.unwrap();
        assert!(reply.starts_with("Here's a summary of the page content"));

        let reply = p.respond("help please", "").await.unwrap();
        assert!(reply.contains("- Summarizing page content"));
        assert!(reply.ends_with("What would you like to know about this page?"));
    }

    #[tokio::test]
    async fn test_simulated_quotes_first_context_line() {
        let p = SimulatedProvider::with_delay(Duration::ZERO);
        let reply = p
            .respond("who wrote this?", "Current page: Rust Blog\nURL: https://blog.rust-lang.org")
            .await
            .unwrap();
        assert!(reply.starts_with("Based on the current page \"Current page: Rust Blog\""));
        assert!(!reply.contains("URL:"));
    }

    #[test]
    fn test_error_messages() {
        assert!(ProviderError::Timeout(30).to_string().contains("30"));
        let err = ProviderError::Api {
            status: 503,
            message: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "API error: 503 - overloaded");
    }
}
