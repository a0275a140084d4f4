//! Toggle engine
//!
//! Computes the selection that results from flipping one pack, honoring
//! prerequisites (`[<X]`) and mutual exclusion (`[!X]`) across all
//! categories. Pure: nothing here touches storage or mutates its inputs.

pub mod exclusion;
pub mod prerequisite;

pub use exclusion::{apply_exclusions, disable_dependents};
pub use prerequisite::{check_prerequisites, PrerequisiteCheck};

use model::{FeaturePack, Selection};
use tracing::debug;

/// Result of a toggle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// New selection, or the untouched input selection on rejection
    pub selection: Selection,
    pub success: bool,
    /// Human-readable rejection reason
    pub error: Option<String>,
    /// Prerequisite targets that blocked the toggle
    pub missing_prerequisites: Option<Vec<String>>,
}

impl ToggleOutcome {
    fn accepted(selection: Selection) -> Self {
        Self {
            selection,
            success: true,
            error: None,
            missing_prerequisites: None,
        }
    }

    fn rejected(selection: &Selection, missing: Vec<String>) -> Self {
        Self {
            selection: selection.clone(),
            success: false,
            error: Some(format!("missing prerequisites: {}", missing.join(", "))),
            missing_prerequisites: Some(missing),
        }
    }

    pub fn is_rejected(&self) -> bool {
        !self.success
    }
}

/// Flip `target_key` in a copy of `selection` and apply the rule cascades.
///
/// Enabling is rejected when any prerequisite is unselected. Enabling forces
/// off every pack matched by the target's exclusions; disabling forces off
/// every selected pack listing the target's label as a prerequisite. Both
/// cascades are single-pass.
pub fn toggle(selection: &Selection, packs: &[FeaturePack], target_key: &str) -> ToggleOutcome {
    let mut next_selection = selection.clone();
    let enable = !selection.get(target_key);
    let target = packs.iter().find(|p| p.identity_key == target_key);

    if let Some(pack) = target {
        if enable && !pack.prerequisite_targets.is_empty() {
            let check = check_prerequisites(packs, selection, &pack.prerequisite_targets);
            if !check.satisfied() {
                debug!(
                    "Rejecting {}: missing prerequisites {:?}",
                    pack.label, check.missing
                );
                return ToggleOutcome::rejected(selection, check.missing);
            }
        }
    }

    next_selection.set(target_key, enable);

    if let Some(pack) = target {
        if enable {
            apply_exclusions(packs, &mut next_selection, pack);
        } else {
            disable_dependents(packs, &mut next_selection, pack);
        }
    }

    ToggleOutcome::accepted(next_selection)
}

/// Resolve a user-supplied pack reference by identity key, then by label
pub fn find_pack<'a>(packs: &'a [FeaturePack], query: &str) -> Option<&'a FeaturePack> {
    packs
        .iter()
        .find(|p| p.identity_key == query)
        .or_else(|| packs.iter().find(|p| p.label == query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::build_packs;
    use model::Record;

    fn load(names: &[(&str, bool)]) -> (Vec<FeaturePack>, Selection) {
        let records: Vec<Record> = names.iter().map(|(n, e)| Record::new(*n, *e)).collect();
        build_packs(&records)
    }

    #[test]
    fn test_toggle_flips_plain_pack() {
        let (packs, selection) = load(&[("[DLC][角色][A]", false)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert!(outcome.success);
        assert!(outcome.selection.get("[DLC][角色][A]"));

        let back = toggle(&outcome.selection, &packs, "[DLC][角色][A]");
        assert!(!back.selection.get("[DLC][角色][A]"));
    }

    #[test]
    fn test_prerequisite_rejection_leaves_selection() {
        let (packs, selection) = load(&[("[DLC][角色][A][<B]", false), ("[DLC][角色][B]", false)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");

        assert!(outcome.is_rejected());
        assert_eq!(outcome.selection, selection);
        assert_eq!(outcome.missing_prerequisites, Some(vec!["B".to_string()]));
        assert_eq!(outcome.error.as_deref(), Some("missing prerequisites: B"));
    }

    #[test]
    fn test_disabling_skips_prerequisite_check() {
        let (packs, selection) = load(&[("[DLC][角色][A][<B]", true)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert!(outcome.success);
        assert!(!outcome.selection.get("[DLC][角色][A]"));
    }

    #[test]
    fn test_exclusion_cascade() {
        let (packs, selection) = load(&[("[DLC][角色][A][!B]", false), ("[DLC][事件][B]", true)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");

        assert!(outcome.success);
        assert!(outcome.selection.get("[DLC][角色][A]"));
        assert!(!outcome.selection.get("[DLC][事件][B]"));
    }

    #[test]
    fn test_forced_off_pack_does_not_cascade() {
        // A excludes B; C depends on B. Forcing B off leaves C alone.
        let (packs, selection) = load(&[
            ("[DLC][角色][A][!B]", false),
            ("[DLC][角色][B]", true),
            ("[DLC][角色][C][<B]", true),
        ]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert!(!outcome.selection.get("[DLC][角色][B]"));
        assert!(outcome.selection.get("[DLC][角色][C]"));
    }

    #[test]
    fn test_disable_cascades_to_direct_dependents() {
        let (packs, selection) = load(&[
            ("[DLC][角色][A]", true),
            ("[DLC][事件][B][<A]", true),
            ("[DLC][扩展][C][<B]", true),
        ]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");

        assert!(!outcome.selection.get("[DLC][角色][A]"));
        assert!(!outcome.selection.get("[DLC][事件][B]"));
        assert!(outcome.selection.get("[DLC][扩展][C]"));
    }

    #[test]
    fn test_unknown_key_just_flips() {
        let (packs, selection) = load(&[("[DLC][角色][A]", false)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][Ghost]");
        assert!(outcome.success);
        assert!(outcome.selection.get("[DLC][角色][Ghost]"));
        assert!(!outcome.selection.get("[DLC][角色][A]"));
    }

    #[test]
    fn test_toggle_is_pure() {
        let (packs, selection) = load(&[("[DLC][角色][A][!B]", false), ("[DLC][角色][B]", true)]);
        let packs_before = packs.clone();
        let selection_before = selection.clone();

        let first = toggle(&selection, &packs, "[DLC][角色][A]");
        let second = toggle(&selection, &packs, "[DLC][角色][A]");

        assert_eq!(first, second);
        assert_eq!(packs, packs_before);
        assert_eq!(selection, selection_before);
    }

    #[test]
    fn test_find_pack() {
        let (packs, _) = load(&[("[DLC][角色][A]", false), ("[DLC][事件][B]", false)]);
        assert_eq!(find_pack(&packs, "B").unwrap().identity_key, "[DLC][事件][B]");
        assert_eq!(find_pack(&packs, "[DLC][角色][A]").unwrap().label, "A");
        assert!(find_pack(&packs, "Z").is_none());
    }
}
