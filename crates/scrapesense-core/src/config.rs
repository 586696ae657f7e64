//! Runtime configuration and data directory management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Maximum accepted request body size (10 MB).
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_DIR: &str = "data";

/// Whether error responses may carry internal details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Top-level ScrapeSense configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSenseConfig {
    /// Bind address for the HTTP server.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    pub mode: RunMode,
    /// Root data directory (`data/`).
    pub data_dir: PathBuf,
    /// Provider selection file (`data/provider-config.json`).
    pub provider_config_file: PathBuf,
    pub body_limit: usize,
}

impl ScrapeSenseConfig {
    /// Create configuration from the process environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let host = lookup("SCRAPESENSE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let mode = lookup("SCRAPESENSE_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .map(|m| RunMode::from_name(&m))
            .unwrap_or(RunMode::Production);

        let data_dir = lookup("SCRAPESENSE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self {
            host,
            port,
            mode,
            provider_config_file: data_dir.join("provider-config.json"),
            data_dir,
            body_limit: BODY_LIMIT_BYTES,
        })
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create the data directory if it does not exist.
    pub fn ensure_data_dir(&self) -> Result<()> {
        ensure_dir(&self.data_dir)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if let Err(e) = std::fs::create_dir_all(path) {
        warn!("Failed to create data directory {}: {}", path.display(), e);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ScrapeSenseConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.mode, RunMode::Production);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.body_limit, 10 * 1024 * 1024);
        assert!(config.provider_config_file.ends_with("provider-config.json"));
    }

    #[test]
    fn test_node_env_fallback() {
        let config =
            ScrapeSenseConfig::from_lookup(lookup_from(&[("NODE_ENV", "development")])).unwrap();
        assert!(config.mode.is_development());

        let config = ScrapeSenseConfig::from_lookup(lookup_from(&[
            ("NODE_ENV", "development"),
            ("SCRAPESENSE_ENV", "production"),
        ]))
        .unwrap();
        assert_eq!(config.mode, RunMode::Production);
    }

    #[test]
    fn test_invalid_port() {
        let err = ScrapeSenseConfig::from_lookup(lookup_from(&[("PORT", "abc")])).unwrap_err();
        assert!(err.to_string().contains("invalid PORT"));
    }

    #[test]
    fn test_ensure_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("nested").join("data");
        let config = ScrapeSenseConfig::from_lookup(lookup_from(&[(
            "SCRAPESENSE_DATA_DIR",
            data.to_str().unwrap(),
        )]))
        .unwrap();
        config.ensure_data_dir().unwrap();
        assert!(data.is_dir());
    }
}
