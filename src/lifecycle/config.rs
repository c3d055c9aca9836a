//! # Console Configuration
//!
//! Loaded from a TOML file. Every section and key is optional:
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com/api"
//! user_agent = "seating-console/0.1"
//!
//! [list]
//! page_size = 25
//!
//! [storage]
//! path = "console-state.json"   # in-memory when absent
//! ```

use crate::framework::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Page size of the admin tables. Resources with their own size keep it.
    pub page_size: u32,
    /// Request buffer of each controller.
    pub buffer_size: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            buffer_size: 32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub list: ListConfig,
    pub storage: StorageConfig,
}

impl ConsoleConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let raw = self.api.base_url.trim();
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::Invalid(format!("api.base_url {raw:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL with a host, got {raw:?}"
            )));
        }
        if self.list.page_size == 0 {
            return Err(ConfigError::Invalid("list.page_size must be at least 1".into()));
        }
        if self.list.buffer_size == 0 {
            return Err(ConfigError::Invalid("list.buffer_size must be at least 1".into()));
        }
        Ok(())
    }
}
