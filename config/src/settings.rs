//! Configuration container

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for dlcman
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document to operate on; `None` lets the store pick its first document
    pub document: Option<String>,
    /// Record store settings
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: None,
            store: StoreConfig::default(),
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite record database
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: crate::paths::store(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check for values no store can work with
    pub fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store path is empty".to_string()));
        }

        if let Some(doc) = &self.document {
            if doc.trim().is_empty() {
                return Err(ConfigError::Invalid("document name is blank".to_string()));
            }
        }

        if let Some(parent) = self.store.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::warn!("Store directory does not exist yet: {}", parent.display());
            }
        }

        Ok(())
    }

    /// Apply `DLCMAN_STORE` / `DLCMAN_DOCUMENT` overrides
    pub fn apply_env(mut self) -> Self {
        if let Ok(path) = std::env::var(crate::env_vars::STORE) {
            if !path.is_empty() {
                self.store.path = PathBuf::from(path);
            }
        }
        if let Ok(doc) = std::env::var(crate::env_vars::DOCUMENT) {
            if !doc.trim().is_empty() {
                self.document = Some(doc);
            }
        }
        self
    }
}
