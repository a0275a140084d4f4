//! Record stores
//!
//! The only I/O boundary of the pack engine. A store holds named documents,
//! each a flat list of records, and supports two operations: pattern queries
//! and a single atomic batch update of enabled flags.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::Result;
use async_trait::async_trait;
use model::{Record, RecordUpdate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the document a session operates on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHandle(String);

impl DocumentHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend holding tagged records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Resolve which document this session works against
    async fn document_handle(&self) -> Result<DocumentHandle>;

    /// Records of `document` whose name matches `pattern`, in stored order
    async fn query_records(&self, document: &DocumentHandle, pattern: &Regex)
        -> Result<Vec<Record>>;

    /// Replace the enabled flag of every named record in one atomic call.
    ///
    /// Records not mentioned are untouched.
    async fn write_records(&self, document: &DocumentHandle, updates: &[RecordUpdate])
        -> Result<()>;
}
