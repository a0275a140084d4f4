//! Configuration detection for the dlcman CLI
//!
//! Works out which configuration file applies and layers environment and
//! command-line overrides on top of it.

use anyhow::{Context, Result};
use config::{Config, ConfigLoader};
use std::path::{Path, PathBuf};

/// Command-line overrides, highest precedence
#[derive(Debug, Default)]
pub struct Overrides {
    pub store: Option<PathBuf>,
    pub document: Option<String>,
}

/// Resolve the effective configuration
///
/// Searches in order:
/// 1. User-specified file (if provided via --config), which must exist
/// 2. The user configuration root (`~/.config/dlcman/dlcman.toml`)
/// 3. The system configuration root (`/etc/dlcman/dlcman.toml`)
/// 4. Built-in defaults
///
/// `DLCMAN_STORE` / `DLCMAN_DOCUMENT` are then applied, then `overrides`.
pub fn resolve_config(custom_path: Option<&Path>, overrides: Overrides) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => detect_config()?,
    };

    let mut config = config.apply_env();
    if let Some(store) = overrides.store {
        config.store.path = store;
    }
    if let Some(document) = overrides.document {
        config.document = Some(document);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Candidate configuration roots, most specific first
pub fn search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(loader) = ConfigLoader::user() {
        roots.push(loader.root().to_path_buf());
    }
    roots.push(ConfigLoader::system().root().to_path_buf());
    roots
}

fn detect_config() -> Result<Config> {
    for root in search_roots() {
        let loader = ConfigLoader::new(&root).use_defaults(false).validate(false);
        if loader.config_path().exists() {
            tracing::debug!("Using configuration at {}", loader.config_path().display());
            return loader
                .load()
                .with_context(|| format!("Failed to load {}", loader.config_path().display()));
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_search_roots_end_with_system() {
        let roots = search_roots();
        assert_eq!(roots.last().unwrap(), &PathBuf::from("/etc/dlcman"));
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dlcman.toml");
        std::fs::write(
            &path,
            "document = \"from-file\"\n\n[store]\npath = \"/tmp/file.db\"\n",
        )
        .unwrap();

        let overrides = Overrides {
            store: Some(temp_dir.path().join("flag.db")),
            document: Some("from-flag".to_string()),
        };
        let config = resolve_config(Some(&path), overrides).unwrap();

        assert_eq!(config.store.path, temp_dir.path().join("flag.db"));
        assert_eq!(config.document.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_missing_custom_file_is_error() {
        let result = resolve_config(Some(Path::new("/nonexistent/dlcman.toml")), Overrides::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_document_flag_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dlcman.toml");
        std::fs::write(&path, "").unwrap();

        let overrides = Overrides {
            store: None,
            document: Some(" ".to_string()),
        };
        assert!(resolve_config(Some(&path), overrides).is_err());
    }
}
