//! Append-only chat transcript.

use crate::types::{Message, Role};

/// Greeting shown when the panel first opens.
pub const INITIAL_GREETING: &str = "Hi! I'm ScrapeSense, your AI-powered web assistant. \
I can help you understand and summarize the content on this page. What would you like to know?";

/// Greeting shown after the user clears the chat.
pub const CLEARED_GREETING: &str = "Hi! I'm ScrapeSense. How can I help you with this page?";

/// Ordered chat messages, always starting with one greeting.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::new(Role::Assistant, INITIAL_GREETING)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Reset to a single greeting.
    pub fn clear(&mut self) {
        self.messages = vec![Message::new(Role::Assistant, CLEARED_GREETING)];
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
