//! Chat panel state: transcript, page context, and the assistant.

use std::sync::Arc;

use scrapesense_extract::{truncate_chars, PageSnapshot};
use tracing::{error, info};

use crate::provider::AssistantProvider;
use crate::transcript::Transcript;
use crate::types::{Message, Role};

/// Characters of page text handed to the assistant as context.
pub const CONTEXT_TEXT_CHARS: usize = 5_000;

/// Context used when no snapshot is available.
pub const NO_PAGE_CONTEXT: &str = "No page content available";

/// Reply shown when the assistant fails.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub struct ChatPanel {
    transcript: Transcript,
    page: Option<PageSnapshot>,
    provider: Arc<dyn AssistantProvider>,
}

impl ChatPanel {
    pub fn new(provider: Arc<dyn AssistantProvider>) -> Self {
        Self {
            transcript: Transcript::new(),
            page: None,
            provider,
        }
    }

    /// Set (or forget) the page snapshot the panel talks about.
    pub fn set_page_content(&mut self, page: Option<PageSnapshot>) {
        if let Some(p) = &page {
            info!("Chat panel attached to {}", p.url);
        }
        self.page = page;
    }

    pub fn page_content(&self) -> Option<&PageSnapshot> {
        self.page.as_ref()
    }

    /// Textual context describing the current page.
    pub fn page_context(&self) -> String {
        match &self.page {
            Some(p) => format!(
                "Current page: {}\nURL: {}\nPage content: {}",
                p.title,
                p.url,
                truncate_chars(&p.text, CONTEXT_TEXT_CHARS)
            ),
            None => NO_PAGE_CONTEXT.to_string(),
        }
    }

    /// Send user input. Blank input is ignored and returns `None`;
    /// otherwise returns the assistant's reply message.
    pub async fn send(&mut self, input: &str) -> Option<&Message> {
        if input.trim().is_empty() {
            return None;
        }

        self.transcript.push(Message::new(Role::User, input));

        let context = self.page_context();
        let content = match self.provider.respond(input, &context).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error getting assistant response from {}: {}", self.provider.id(), e);
                ERROR_REPLY.to_string()
            }
        };

        self.transcript.push(Message::new(Role::Assistant, content));
        self.transcript.last()
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
