//! Shared application state.

use std::sync::Arc;

use parking_lot::RwLock;
use scrapesense_chat::{AssistantProvider, ProviderConfig};
use scrapesense_core::ScrapeSenseConfig;
use scrapesense_relay::{Relay, RelayHandle};
use tracing::info;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ScrapeSenseConfig,
    pub provider_config: RwLock<ProviderConfig>,
    provider: RwLock<Arc<dyn AssistantProvider>>,
    pub relay: RelayHandle,
}

impl AppState {
    /// Build state from configuration. Spawns the relay worker, so this
    /// must run inside a tokio runtime.
    pub fn new(config: ScrapeSenseConfig) -> Self {
        let provider_config = ProviderConfig::load(&config.provider_config_file);
        let provider = provider_config.build_provider();
        Self::build(config, provider_config, provider)
    }

    /// Build state around an explicit provider. The provider config starts
    /// from defaults and is saved to the configured file on update.
    pub fn with_provider(config: ScrapeSenseConfig, provider: Arc<dyn AssistantProvider>) -> Self {
        let provider_config = ProviderConfig {
            config_path: config.provider_config_file.clone(),
            ..Default::default()
        };
        Self::build(config, provider_config, provider)
    }

    fn build(
        config: ScrapeSenseConfig,
        provider_config: ProviderConfig,
        provider: Arc<dyn AssistantProvider>,
    ) -> Self {
        info!("Assistant provider: {}", provider.id());
        Self {
            config,
            provider_config: RwLock::new(provider_config),
            provider: RwLock::new(provider),
            relay: RelayHandle::spawn(Relay::new()),
        }
    }

    /// The provider currently answering chat requests.
    pub fn provider(&self) -> Arc<dyn AssistantProvider> {
        self.provider.read().clone()
    }

    /// Swap in a new provider; in-flight requests finish on the old one.
    pub fn set_provider(&self, provider: Arc<dyn AssistantProvider>) {
        info!("Assistant provider switched to {}", provider.id());
        *self.provider.write() = provider;
    }
}
