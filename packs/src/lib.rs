//! dlcman pack engine
//!
//! Groups tagged records from a record store into feature packs (DLCs) and
//! enforces the relationship rules between them.
//!
//! # Architecture
//!
//! - **Tags**: stateless parser for `[DLC][category][label]` names and the
//!   `[!X]` / `[>X]` / `[<X]` relationship tags
//! - **Group**: builds packs and the initial selection from raw records
//! - **Resolver**: pure toggle engine (prerequisite gate, exclusion and
//!   dependent cascades)
//! - **Transaction**: diffs the selection against committed packs and writes
//!   the merged result in one batch
//! - **Db**: record store trait with SQLite and in-memory backends
//!
//! Cascades are single-pass by design of the rule set: turning A off does not
//! disable C when C depends on B and B depends on A, unless C names A itself.
//! Two sessions saving against the same document are not coordinated; the
//! later save works from its own snapshot and can overwrite the earlier one.

pub mod db;
pub mod error;
pub mod group;
pub mod resolver;
pub mod tags;
pub mod transaction;

pub use db::{DocumentHandle, MemoryStore, RecordStore, SqliteStore};
pub use error::{Error, Result};
pub use group::{build_packs, sort_packs};
pub use resolver::{find_pack, toggle, ToggleOutcome};
pub use transaction::{has_changes, plan_save, reconcile, save, Reconciled, SavePlan, Transaction};

pub use model::{Category, FeaturePack, Record, RecordUpdate, Selection};

use dlcman_config::Config;
use std::sync::Arc;
use tracing::info;

/// Outcome of a committed save
#[derive(Debug, Clone)]
pub struct SaveReport {
    /// Number of record updates written; zero when nothing changed
    pub written: usize,
}

/// One editing session against one document.
///
/// Holds the committed packs and the staged selection. Toggles only touch
/// the selection; `save` is the only call that writes.
pub struct DlcManager {
    store: Arc<dyn RecordStore>,
    document: DocumentHandle,
    packs: Vec<FeaturePack>,
    selection: Selection,
}

impl std::fmt::Debug for DlcManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DlcManager")
            .field("document", &self.document)
            .field("packs", &self.packs)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl DlcManager {
    /// Load packs from the store's current document
    pub async fn load(store: Arc<dyn RecordStore>) -> Result<Self> {
        let document = store.document_handle().await?;
        let (packs, selection) = load_packs(store.as_ref(), &document).await?;

        Ok(Self {
            store,
            document,
            packs,
            selection,
        })
    }

    /// Open the configured SQLite store and load from it
    pub async fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = SqliteStore::open(&config.store.path)?.with_document(config.document.clone());
        Self::load(Arc::new(store)).await
    }

    /// Committed packs in canonical order
    pub fn packs(&self) -> &[FeaturePack] {
        &self.packs
    }

    /// Staged selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn document(&self) -> &DocumentHandle {
        &self.document
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Look up a pack by identity key or label
    pub fn find(&self, query: &str) -> Option<&FeaturePack> {
        find_pack(&self.packs, query)
    }

    /// Toggle a pack; the selection only changes when the toggle succeeds
    pub fn toggle(&mut self, query: &str) -> Result<ToggleOutcome> {
        let key = self
            .find(query)
            .map(|p| p.identity_key.clone())
            .ok_or_else(|| Error::PackNotFound(query.to_string()))?;

        let outcome = toggle(&self.selection, &self.packs, &key);
        if outcome.success {
            self.selection = outcome.selection.clone();
        }
        Ok(outcome)
    }

    pub fn has_changes(&self) -> bool {
        has_changes(&self.packs, &self.selection)
    }

    /// Compute what `save` would write
    pub async fn plan(&self) -> Result<SavePlan> {
        plan_save(&self.packs, &self.selection, self.store.as_ref(), &self.document).await
    }

    /// Commit the selection.
    ///
    /// On error the session is left exactly as it was, so retrying is safe.
    pub async fn save(&mut self) -> Result<SaveReport> {
        let reconciled =
            transaction::reconcile(&self.packs, &self.selection, self.store.as_ref(), &self.document)
                .await?;

        if reconciled.written > 0 {
            self.packs = reconciled.packs;
            self.selection = Selection::from_packs(&self.packs);
        }
        Ok(SaveReport {
            written: reconciled.written,
        })
    }

    /// Rebuild packs and selection from storage, discarding staged changes
    pub async fn reload(&mut self) -> Result<()> {
        let (packs, selection) = load_packs(self.store.as_ref(), &self.document).await?;
        self.packs = packs;
        self.selection = selection;
        Ok(())
    }
}

async fn load_packs(
    store: &dyn RecordStore,
    document: &DocumentHandle,
) -> Result<(Vec<FeaturePack>, Selection)> {
    let records = store.query_records(document, &tags::DLC_PATTERN).await?;
    let (packs, selection) = build_packs(&records);
    info!(
        "Loaded {} feature packs from {} records in {}",
        packs.len(),
        records.len(),
        document
    );
    Ok((packs, selection))
}
