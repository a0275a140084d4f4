//! SQLite-backed record store
//!
//! Documents and their records live in one database file. Batch updates run
//! inside a single SQL transaction so a failed write leaves nothing behind.

use super::{DocumentHandle, RecordStore};
use crate::{Error, Result};
use async_trait::async_trait;
use model::{Record, RecordUpdate};
use parking_lot::Mutex;
use regex::Regex;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info, warn};

/// Record store persisted in SQLite
pub struct SqliteStore {
    conn: Mutex<Connection>,
    /// Document pinned by configuration, if any
    document: Option<String>,
}

impl SqliteStore {
    /// Open or create the record database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
            document: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Pin the document returned by `document_handle`
    pub fn with_document(mut self, document: Option<String>) -> Self {
        self.document = document;
        self
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.lock().execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- Logical documents (world books)
            CREATE TABLE IF NOT EXISTS documents (
                name TEXT PRIMARY KEY
            );

            -- Tagged records, kept in insertion order via id
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document TEXT NOT NULL,
                name TEXT NOT NULL,
                enabled INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (document) REFERENCES documents(name) ON DELETE CASCADE,
                UNIQUE(document, name)
            );

            CREATE INDEX IF NOT EXISTS idx_records_document ON records(document);
            "#,
        )?;

        Ok(())
    }

    /// List document names in name order
    pub fn documents(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name FROM documents ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Check whether a document exists
    pub fn has_document(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.lock().query_row(
            "SELECT COUNT(*) FROM documents WHERE name = ?",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Replace a document's records, creating the document if needed.
    ///
    /// Duplicate names keep the last occurrence's flag.
    pub fn import_document(&self, name: &str, records: &[Record]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO documents (name) VALUES (?)",
            params![name],
        )?;
        tx.execute("DELETE FROM records WHERE document = ?", params![name])?;

        for record in records {
            tx.execute(
                "INSERT INTO records (document, name, enabled) VALUES (?1, ?2, ?3)
                 ON CONFLICT(document, name) DO UPDATE SET enabled = excluded.enabled",
                params![name, record.name, record.enabled],
            )?;
        }

        tx.commit()?;
        info!("Imported {} records into document {}", records.len(), name);
        Ok(records.len())
    }

    /// All records of a document in stored order
    pub fn export_document(&self, name: &str) -> Result<Vec<Record>> {
        if !self.has_document(name)? {
            return Err(Error::DocumentNotFound(name.to_string()));
        }

        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT name, enabled FROM records WHERE document = ? ORDER BY id")?;
        let rows = stmt.query_map(params![name], |row| {
            Ok(Record {
                name: row.get(0)?,
                enabled: row.get(1)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn document_handle(&self) -> Result<DocumentHandle> {
        match &self.document {
            Some(name) => {
                if self.has_document(name)? {
                    Ok(DocumentHandle::new(name.clone()))
                } else {
                    Err(Error::DocumentNotFound(name.clone()))
                }
            }
            None => self
                .documents()?
                .into_iter()
                .next()
                .map(DocumentHandle::new)
                .ok_or(Error::NoDocument),
        }
    }

    async fn query_records(
        &self,
        document: &DocumentHandle,
        pattern: &Regex,
    ) -> Result<Vec<Record>> {
        let records = self.export_document(document.name())?;
        let matched: Vec<Record> = records
            .into_iter()
            .filter(|r| pattern.is_match(&r.name))
            .collect();
        debug!(
            "Query {} on {} matched {} records",
            pattern.as_str(),
            document,
            matched.len()
        );
        Ok(matched)
    }

    async fn write_records(
        &self,
        document: &DocumentHandle,
        updates: &[RecordUpdate],
    ) -> Result<()> {
        if !self.has_document(document.name())? {
            return Err(Error::DocumentNotFound(document.to_string()));
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        for update in updates {
            let changed = tx.execute(
                "UPDATE records SET enabled = ?1 WHERE document = ?2 AND name = ?3",
                params![update.enabled, document.name(), update.name],
            )?;
            if changed == 0 {
                warn!("Ignoring update for unknown record: {}", update.name);
            }
        }

        tx.commit()?;
        debug!("Committed {} record updates to {}", updates.len(), document);
        Ok(())
    }
}
