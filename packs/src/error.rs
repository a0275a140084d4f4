//! Error types for the pack engine

use thiserror::Error;

/// Result type alias for pack engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pack engine errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Feature pack not found: {0}")]
    PackNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Record store has no documents")]
    NoDocument,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] dlcman_config::ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
}
