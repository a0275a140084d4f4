//! Configuration loading utilities
//!
//! Finds `dlcman.toml` under a configuration root and falls back to
//! defaults when it is absent.

use crate::{Config, ConfigError, Result};
use std::path::{Path, PathBuf};

/// Name of the configuration file inside a configuration root
pub const CONFIG_FILE: &str = "dlcman.toml";

/// Configuration loader
pub struct ConfigLoader {
    /// Root path for configuration
    root: PathBuf,
    /// Whether to use default values for a missing config file
    use_defaults: bool,
    /// Whether to validate configuration after loading
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            use_defaults: true,
            validate: true,
        }
    }

    /// Create a loader for the system configuration
    pub fn system() -> Self {
        Self::new(paths::system_config())
    }

    /// Create a loader for the user configuration
    pub fn user() -> Result<Self> {
        let root = paths::user_config()
            .ok_or_else(|| ConfigError::Invalid("Could not determine user config path".into()))?;
        Ok(Self::new(root))
    }

    /// Set whether to use defaults for a missing config file
    pub fn use_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    /// Set whether to validate configuration
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Load the configuration
    pub fn load(&self) -> Result<Config> {
        let path = self.config_path();
        let config = if path.exists() {
            tracing::debug!("Loading configuration from {}", path.display());
            Config::load_from(&path)?
        } else if self.use_defaults {
            Config::default()
        } else {
            return Err(ConfigError::NotFound(path));
        };

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Get the configuration root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get path to the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }
}

/// Default paths
pub mod paths {
    use std::path::PathBuf;

    /// System configuration root
    pub fn system_config() -> PathBuf {
        PathBuf::from("/etc/dlcman")
    }

    /// User configuration root
    pub fn user_config() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dlcman"))
    }

    /// Default record database
    pub fn store() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("dlcman"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/dlcman"))
            .join("records.db")
    }
}

/// Environment variable names used by the configuration system
pub mod env_vars {
    /// Record store path override
    pub const STORE: &str = "DLCMAN_STORE";
    /// Document name override
    pub const DOCUMENT: &str = "DLCMAN_DOCUMENT";
}
