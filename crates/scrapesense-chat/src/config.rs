//! Provider configuration persistence and provider selection.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::openai::{self, OpenAiCompatProvider};
use crate::provider::{AssistantProvider, EchoProvider, SimulatedProvider};

/// Which provider backs the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Echo,
    Simulated,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "echo" => Some(Self::Echo),
            "simulated" => Some(Self::Simulated),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }
}

/// Stored provider configuration (persisted to provider-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_model")]
    pub openai_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_base_url() -> String {
    openai::DEFAULT_BASE_URL.into()
}
fn default_model() -> String {
    openai::DEFAULT_MODEL.into()
}
fn default_timeout_secs() -> u64 {
    openai::DEFAULT_TIMEOUT.as_secs()
}

/// Provider config update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfigUpdate {
    pub provider: Option<ProviderKind>,
    #[serde(rename = "openaiApiKey")]
    pub openai_api_key: Option<String>,
    #[serde(rename = "openaiBaseUrl")]
    pub openai_base_url: Option<String>,
    #[serde(rename = "openaiModel")]
    pub openai_model: Option<String>,
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

/// Provider config response (key masked).
#[derive(Debug, Clone, Serialize)]
pub struct ProviderConfigResponse {
    pub provider: ProviderKind,
    #[serde(rename = "openaiConfigured")]
    pub openai_configured: bool,
    #[serde(rename = "openaiBaseUrl")]
    pub openai_base_url: String,
    #[serde(rename = "openaiModel")]
    pub openai_model: String,
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: u64,
    #[serde(rename = "activeProvider")]
    pub active_provider: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Echo,
            openai_api_key: None,
            openai_base_url: default_base_url(),
            openai_model: default_model(),
            timeout_secs: default_timeout_secs(),
            config_path: PathBuf::new(),
        }
    }
}

impl ProviderConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Load config from file, with `lookup` standing in for the environment.
    pub fn load_with<F>(config_path: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: Option<serde_json::Value> = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| match serde_json::from_str(&s) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Ignoring unreadable {}: {}", config_path.display(), e);
                    None
                }
            });
        let mut config: ProviderConfig = file
            .clone()
            .and_then(|v| match serde_json::from_value(v) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!("Ignoring invalid {}: {}", config_path.display(), e);
                    None
                }
            })
            .unwrap_or_default();
        config.config_path = config_path.to_path_buf();

        // Env only fills in what the file left unset.
        let file_sets = |key: &str| {
            file.as_ref()
                .and_then(|v| v.get(key))
                .is_some_and(|v| !v.is_null())
        };
        if !file_sets("provider") {
            if let Some(kind) = lookup("SCRAPESENSE_PROVIDER").and_then(|n| ProviderKind::from_name(&n)) {
                config.provider = kind;
            }
        }
        if !file_sets("openai_base_url") {
            if let Some(url) = lookup("OPENAI_BASE_URL") {
                config.openai_base_url = url;
            }
        }
        if !file_sets("openai_model") {
            if let Some(model) = lookup("OPENAI_MODEL") {
                config.openai_model = model;
            }
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = lookup("OPENAI_API_KEY");
        }

        config
    }

    /// Apply a partial update. Unset fields are left alone.
    pub fn apply_update(&mut self, update: &ProviderConfigUpdate) {
        if let Some(p) = update.provider {
            self.provider = p;
        }
        if let Some(k) = &update.openai_api_key {
            self.openai_api_key = Some(k.clone()).filter(|k| !k.is_empty());
        }
        if let Some(u) = &update.openai_base_url {
            self.openai_base_url = u.trim_end_matches('/').to_string();
        }
        if let Some(m) = &update.openai_model {
            self.openai_model = m.clone();
        }
        if let Some(t) = update.timeout_secs {
            self.timeout_secs = t;
        }
    }

    /// Public view of the config, with the API key reduced to a flag.
    pub fn to_response(&self, active_provider: &str) -> ProviderConfigResponse {
        ProviderConfigResponse {
            provider: self.provider,
            openai_configured: self.openai_api_key.is_some(),
            openai_base_url: self.openai_base_url.clone(),
            openai_model: self.openai_model.clone(),
            timeout_secs: self.timeout_secs,
            active_provider: active_provider.to_string(),
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved provider config to {}", self.config_path.display());
        Ok(())
    }

    /// Build the configured provider. A remote provider without an API key
    /// falls back to the echo placeholder.
    pub fn build_provider(&self) -> Arc<dyn AssistantProvider> {
        match self.provider {
            ProviderKind::Echo => Arc::new(EchoProvider),
            ProviderKind::Simulated => Arc::new(SimulatedProvider::new()),
            ProviderKind::OpenAi => match &self.openai_api_key {
                Some(key) => Arc::new(
                    OpenAiCompatProvider::new(&self.openai_base_url, &self.openai_model, key)
                        .with_timeout(Duration::from_secs(self.timeout_secs)),
                ),
                None => {
                    warn!("openai provider selected but OPENAI_API_KEY is not set; using echo");
                    Arc::new(EchoProvider)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_echo() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProviderConfig::load_with(&dir.path().join("provider-config.json"), env(&[]));
        assert_eq!(config.provider, ProviderKind::Echo);
        assert_eq!(config.build_provider().id(), "echo");
    }

    #[test]
    fn test_env_selects_provider() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProviderConfig::load_with(
            &dir.path().join("provider-config.json"),
            env(&[
                ("SCRAPESENSE_PROVIDER", "openai"),
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_MODEL", "gpt-4o"),
            ]),
        );
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.build_provider().id(), "openai");
    }

    #[test]
    fn test_openai_without_key_falls_back() {
        let config = ProviderConfig {
            provider: ProviderKind::OpenAi,
            ..Default::default()
        };
        assert_eq!(config.build_provider().id(), "echo");
    }

    #[test]
    fn test_env_fills_fields_the_file_leaves_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider-config.json");
        std::fs::write(&path, r#"{"provider": "simulated"}"#).unwrap();

        let config = ProviderConfig::load_with(
            &path,
            env(&[("SCRAPESENSE_PROVIDER", "openai"), ("OPENAI_MODEL", "gpt-4o")]),
        );
        assert_eq!(config.provider, ProviderKind::Simulated);
        assert_eq!(config.openai_model, "gpt-4o");
    }

    #[test]
    fn test_unreadable_file_falls_back_to_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider-config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = ProviderConfig::load_with(&path, env(&[("SCRAPESENSE_PROVIDER", "simulated")]));
        assert_eq!(config.provider, ProviderKind::Simulated);
    }

    #[test]
    fn test_apply_update_masks_key_in_response() {
        let mut config = ProviderConfig::default();
        config.apply_update(&ProviderConfigUpdate {
            provider: Some(ProviderKind::OpenAi),
            openai_api_key: Some("sk-test".into()),
            openai_base_url: Some("http://localhost:8080/v1/".into()),
            ..Default::default()
        });
        assert_eq!(config.openai_base_url, "http://localhost:8080/v1");

        let json = serde_json::to_value(config.to_response("openai")).unwrap();
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["openaiConfigured"], true);
        assert_eq!(json["activeProvider"], "openai");
        assert!(json.get("openaiApiKey").is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("provider-config.json");
        let config = ProviderConfig {
            provider: ProviderKind::Simulated,
            config_path: path.clone(),
            ..Default::default()
        };
        config.save().unwrap();

        // File wins over env for the provider choice.
        let loaded = ProviderConfig::load_with(&path, env(&[("SCRAPESENSE_PROVIDER", "openai")]));
        assert_eq!(loaded.provider, ProviderKind::Simulated);
        assert_eq!(loaded.build_provider().id(), "simulated");
    }
}
