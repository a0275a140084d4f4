//! Diff and reconciliation of a staged selection
//!
//! Turns a selection into one batch of record updates and commits it with a
//! single store write. Three rule effects are merged, with disabling always
//! outranking enabling for the same record:
//!
//! 1. exclusion targets of selected packs are disabled
//! 2. replacement targets of selected packs are disabled
//! 3. replacement targets of packs going from on to off are re-enabled

use crate::db::{DocumentHandle, RecordStore};
use crate::tags;
use crate::Result;
use indexmap::IndexMap;
use model::{FeaturePack, RecordUpdate, Selection};
use std::collections::HashMap;
use tracing::{debug, info};

/// Check whether any pack's committed state differs from the selection
pub fn has_changes(packs: &[FeaturePack], selection: &Selection) -> bool {
    selection.differs_from(packs)
}

/// Staged record updates keyed by name, in first-staged order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    updates: IndexMap<String, bool>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a value, overwriting any earlier value for the same name
    pub fn stage(&mut self, name: impl Into<String>, enabled: bool) {
        self.updates.insert(name.into(), enabled);
    }

    /// Stage `false`, overwriting any earlier value
    pub fn stage_disable(&mut self, name: impl Into<String>) {
        self.updates.insert(name.into(), false);
    }

    /// Stage `true` unless the name is already staged `false`.
    ///
    /// A staged `false` always wins, whether it came from a pack the user
    /// turned off or from an exclusion or replacement rule.
    pub fn stage_enable(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.updates.get(&name) != Some(&false) {
            self.updates.insert(name, true);
        }
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.updates.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn updates(&self) -> Vec<RecordUpdate> {
        self.updates
            .iter()
            .map(|(name, enabled)| RecordUpdate::new(name.clone(), *enabled))
            .collect()
    }

    /// Commit every staged update with exactly one store write
    pub async fn commit(&self, store: &dyn RecordStore, document: &DocumentHandle) -> Result<()> {
        store.write_records(document, &self.updates()).await
    }
}

/// Everything a save would write, computed without writing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavePlan {
    pub transaction: Transaction,
    pub disable_by_exclusion: Vec<String>,
    pub disable_by_replacement: Vec<String>,
    /// Replacement targets to restore, already filtered against both disable sets
    pub enable_by_replacement: Vec<String>,
}

impl SavePlan {
    pub fn is_empty(&self) -> bool {
        self.transaction.is_empty()
    }

    pub fn updates(&self) -> Vec<RecordUpdate> {
        self.transaction.updates()
    }
}

/// Compute the write set for a save without committing it.
///
/// Returns an empty plan, with no store queries, when nothing changed.
pub async fn plan_save(
    packs: &[FeaturePack],
    selection: &Selection,
    store: &dyn RecordStore,
    document: &DocumentHandle,
) -> Result<SavePlan> {
    if !has_changes(packs, selection) {
        return Ok(SavePlan::default());
    }

    let original: HashMap<&str, bool> = packs
        .iter()
        .map(|p| (p.identity_key.as_str(), p.enabled))
        .collect();

    let mut transaction = Transaction::new();
    for pack in packs {
        let enabled = selection.get(&pack.identity_key);
        for member in &pack.members {
            transaction.stage(member.name.clone(), enabled);
        }
    }

    let disable_by_exclusion = collect_targets(packs, |p| {
        selection.get(&p.identity_key).then_some(&p.exclusion_targets)
    });
    let disable_by_replacement = collect_targets(packs, |p| {
        selection.get(&p.identity_key).then_some(&p.replacement_targets)
    });
    let enable_by_replacement: Vec<String> = collect_targets(packs, |p| {
        let was_enabled = original.get(p.identity_key.as_str()).copied().unwrap_or(false);
        (was_enabled && !selection.get(&p.identity_key)).then_some(&p.replacement_targets)
    })
    .into_iter()
    .filter(|t| !disable_by_replacement.contains(t) && !disable_by_exclusion.contains(t))
    .collect();

    for target in disable_by_exclusion.iter().chain(&disable_by_replacement) {
        for record in query_target(store, document, target).await? {
            transaction.stage_disable(record);
        }
    }

    for target in &enable_by_replacement {
        for record in query_target(store, document, target).await? {
            transaction.stage_enable(record);
        }
    }

    debug!(
        "Planned {} updates (exclude {:?}, replace {:?}, restore {:?})",
        transaction.len(),
        disable_by_exclusion,
        disable_by_replacement,
        enable_by_replacement
    );

    Ok(SavePlan {
        transaction,
        disable_by_exclusion,
        disable_by_replacement,
        enable_by_replacement,
    })
}

/// Result of a reconcile: what was written and the packs after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Record updates committed; zero when nothing changed
    pub written: usize,
    pub packs: Vec<FeaturePack>,
}

/// Commit the selection and report the write with the re-flagged packs.
///
/// Exactly one store write when something changed, none otherwise. On error
/// nothing is committed and the caller's packs remain the truth. Records
/// flipped by another pack's exclusion or replacement targets are not
/// reflected in the returned packs; reload for a fully consistent view.
pub async fn reconcile(
    packs: &[FeaturePack],
    selection: &Selection,
    store: &dyn RecordStore,
    document: &DocumentHandle,
) -> Result<Reconciled> {
    if !has_changes(packs, selection) {
        debug!("No pack changes to save");
        return Ok(Reconciled {
            written: 0,
            packs: packs.to_vec(),
        });
    }

    let plan = plan_save(packs, selection, store, document).await?;
    plan.transaction.commit(store, document).await?;
    info!(
        "Saved {} record updates to {}",
        plan.transaction.len(),
        document
    );

    Ok(Reconciled {
        written: plan.transaction.len(),
        packs: apply_selection(packs, selection),
    })
}

/// Commit the selection and return packs re-flagged to it
pub async fn save(
    packs: &[FeaturePack],
    selection: &Selection,
    store: &dyn RecordStore,
    document: &DocumentHandle,
) -> Result<Vec<FeaturePack>> {
    Ok(reconcile(packs, selection, store, document).await?.packs)
}

/// Packs re-flagged, pack and members alike, to their selected state
pub fn apply_selection(packs: &[FeaturePack], selection: &Selection) -> Vec<FeaturePack> {
    packs
        .iter()
        .map(|p| p.with_enabled(selection.get(&p.identity_key)))
        .collect()
}

/// De-duplicated union of the target lists chosen by `pick`, in pack order
fn collect_targets<'a, F>(packs: &'a [FeaturePack], pick: F) -> Vec<String>
where
    F: Fn(&'a FeaturePack) -> Option<&'a Vec<String>>,
{
    let mut targets: Vec<String> = Vec::new();
    for list in packs.iter().filter_map(pick) {
        for target in list {
            if !targets.contains(target) {
                targets.push(target.clone());
            }
        }
    }
    targets
}

async fn query_target(
    store: &dyn RecordStore,
    document: &DocumentHandle,
    target: &str,
) -> Result<Vec<String>> {
    let pattern = tags::target_pattern(target)?;
    let records = store.query_records(document, &pattern).await?;
    Ok(records.into_iter().map(|r| r.name).collect())
}
