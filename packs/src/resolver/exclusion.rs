//! Single-pass cascades applied after a toggle
//!
//! Neither cascade recurses: a pack forced off here does not trigger its own
//! dependents or re-check anything. A chain C -> B -> A only collapses when C
//! names A directly.

use model::{FeaturePack, Selection};
use tracing::debug;

/// Force off every other pack matched by one of `source`'s exclusion targets
pub fn apply_exclusions(packs: &[FeaturePack], selection: &mut Selection, source: &FeaturePack) {
    for target in &source.exclusion_targets {
        for pack in packs {
            if pack.identity_key != source.identity_key && pack.matches_target(target) {
                debug!(
                    "{} excludes {} via [!{}]",
                    source.label, pack.label, target
                );
                selection.set(pack.identity_key.clone(), false);
            }
        }
    }
}

/// Force off every other selected pack that lists `source`'s label as a prerequisite
pub fn disable_dependents(
    packs: &[FeaturePack],
    selection: &mut Selection,
    source: &FeaturePack,
) {
    for pack in packs {
        if pack.identity_key == source.identity_key {
            continue;
        }
        if selection.get(&pack.identity_key) && pack.prerequisite_targets.contains(&source.label) {
            debug!("{} depends on {}, disabling", pack.label, source.label);
            selection.set(pack.identity_key.clone(), false);
        }
    }
}
