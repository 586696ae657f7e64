//! Chat surface for page-aware assistance.
//!
//! Holds the chat transcript and panel logic, and defines the
//! [`AssistantProvider`] boundary behind which any language-model
//! integration lives. The shipped providers are placeholders.

pub mod config;
pub mod content;
pub mod openai;
pub mod panel;
pub mod provider;
pub mod transcript;
pub mod types;

pub use config::{ProviderConfig, ProviderConfigResponse, ProviderConfigUpdate, ProviderKind};
pub use content::PageContentClient;
pub use panel::ChatPanel;
pub use provider::{AssistantProvider, EchoProvider, ProviderError, SimulatedProvider};
pub use transcript::Transcript;
pub use types::*;
