//! dlcman configuration
//!
//! Locates the record store and the document a session operates on.
//!
//! ```text
//! /etc/dlcman/
//! └── dlcman.toml     # store path and default document
//! ```
//!
//! A minimal `dlcman.toml`:
//!
//! ```toml
//! document = "Main world book"
//!
//! [store]
//! path = "/var/lib/dlcman/records.db"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dlcman_config::ConfigLoader;
//!
//! let config = ConfigLoader::system().load().unwrap();
//! println!("Store: {}", config.store.path.display());
//! ```

pub mod error;
pub mod loader;
pub mod settings;

pub use error::{ConfigError, Result};
pub use loader::{env_vars, paths, ConfigLoader};
pub use settings::{Config, StoreConfig};
