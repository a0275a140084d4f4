//! In-memory record store

use super::{DocumentHandle, RecordStore};
use crate::{Error, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use model::{Record, RecordUpdate};
use parking_lot::Mutex;
use regex::Regex;
use tracing::warn;

/// Record store kept entirely in memory.
///
/// Documents keep insertion order. Every `write_records` call is counted,
/// which makes the store useful for checking how often a caller commits.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<IndexMap<String, Vec<Record>>>,
    document: Option<String>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a single document
    pub fn with_document(name: impl Into<String>, records: Vec<Record>) -> Self {
        let store = Self::new();
        store.insert_document(name, records);
        store
    }

    /// Pin the document returned by `document_handle`
    pub fn select_document(mut self, name: impl Into<String>) -> Self {
        self.document = Some(name.into());
        self
    }

    /// Add or replace a document
    pub fn insert_document(&self, name: impl Into<String>, records: Vec<Record>) {
        self.documents.lock().insert(name.into(), records);
    }

    /// Snapshot of a document's records
    pub fn records(&self, name: &str) -> Option<Vec<Record>> {
        self.documents.lock().get(name).cloned()
    }

    /// Number of `write_records` calls so far
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn document_handle(&self) -> Result<DocumentHandle> {
        let documents = self.documents.lock();
        match &self.document {
            Some(name) if documents.contains_key(name) => Ok(DocumentHandle::new(name.clone())),
            Some(name) => Err(Error::DocumentNotFound(name.clone())),
            None => documents
                .keys()
                .next()
                .map(|name| DocumentHandle::new(name.clone()))
                .ok_or(Error::NoDocument),
        }
    }

    async fn query_records(
        &self,
        document: &DocumentHandle,
        pattern: &Regex,
    ) -> Result<Vec<Record>> {
        let documents = self.documents.lock();
        let records = documents
            .get(document.name())
            .ok_or_else(|| Error::DocumentNotFound(document.to_string()))?;
        Ok(records
            .iter()
            .filter(|r| pattern.is_match(&r.name))
            .cloned()
            .collect())
    }

    async fn write_records(
        &self,
        document: &DocumentHandle,
        updates: &[RecordUpdate],
    ) -> Result<()> {
        let mut documents = self.documents.lock();
        let records = documents
            .get_mut(document.name())
            .ok_or_else(|| Error::DocumentNotFound(document.to_string()))?;

        for update in updates {
            match records.iter_mut().find(|r| r.name == update.name) {
                Some(record) => record.enabled = update.enabled,
                None => warn!("Ignoring update for unknown record: {}", update.name),
            }
        }

        *self.writes.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::with_document(
            "book",
            vec![
                Record::new("[DLC][角色][A]one", false),
                Record::new("lore entry", true),
            ],
        )
    }

    #[tokio::test]
    async fn test_document_handle_defaults_to_first() {
        let store = store();
        store.insert_document("second", vec![]);
        assert_eq!(store.document_handle().await.unwrap().name(), "book");
    }

    #[tokio::test]
    async fn test_document_handle_pinned() {
        let store = store().select_document("missing");
        assert!(matches!(
            store.document_handle().await,
            Err(Error::DocumentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_store_has_no_document() {
        let store = MemoryStore::new();
        assert!(matches!(store.document_handle().await, Err(Error::NoDocument)));
    }

    #[tokio::test]
    async fn test_query_and_write() {
        let store = store();
        let doc = DocumentHandle::new("book");
        let pattern = Regex::new(r"^\[DLC\]").unwrap();

        let found = store.query_records(&doc, &pattern).await.unwrap();
        assert_eq!(found.len(), 1);

        store
            .write_records(
                &doc,
                &[
                    RecordUpdate::new("[DLC][角色][A]one", true),
                    RecordUpdate::new("not there", true),
                ],
            )
            .await
            .unwrap();

        assert_eq!(store.write_count(), 1);
        assert!(store.records("book").unwrap()[0].enabled);
        assert_eq!(store.records("book").unwrap().len(), 2);
    }
}
