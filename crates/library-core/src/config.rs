//! Configuration management for library.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
    pub page_size: u32,
}

impl Config {
    /// Load configuration from library.toml
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_path()?)
    }

    /// Try to load configuration, returning None if not found
    pub fn try_load() -> Option<Self> {
        Self::load().ok()
    }

    /// Create a minimal default configuration for when library.toml is missing
    pub fn default_minimal() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8006,
                request_timeout_secs: None,
            },
            list: ListConfig { page_size: 8 },
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.as_ref().display()))
    }

    /// Find library.toml by searching current directory and parents
    pub fn find_config_path() -> Result<PathBuf> {
        let mut current = std::env::current_dir()?;

        for _ in 0..10 {
            let candidate = current.join("library.toml");
            if candidate.exists() {
                return Ok(candidate);
            }
            if !current.pop() {
                break;
            }
        }

        anyhow::bail!("library.toml not found in current directory or parents")
    }

    /// Get the API base URL
    pub fn api_url(&self) -> String {
        format!("http://{}:{}", self.api.host, self.api.port)
    }

    /// Per-request timeout for list calls
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs.unwrap_or(30))
    }
}
