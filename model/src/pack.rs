use crate::{Category, Record};
use serde::{Deserialize, Serialize};

/// The user-facing unit: every record sharing one identity key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeaturePack {
    /// Identity prefix, e.g. `[DLC][角色][Vivira]`
    pub identity_key: String,
    pub category: Category,
    /// Third bracket of the identity key
    pub label: String,
    pub author: String,
    pub info: String,
    /// `[!X]` targets, forced off when this pack is turned on
    pub exclusion_targets: Vec<String>,
    /// `[>X]` targets, suppressed while this pack is on and restored when it goes off
    pub replacement_targets: Vec<String>,
    /// `[<X]` targets that must be selected before this pack can be turned on
    pub prerequisite_targets: Vec<String>,
    /// Member records in discovery order
    pub members: Vec<Record>,
    /// True iff every member is enabled
    pub enabled: bool,
}

impl FeaturePack {
    /// AND-reduction over member flags; an empty pack is enabled.
    pub fn aggregate_enabled(members: &[Record]) -> bool {
        members.iter().all(|m| m.enabled)
    }

    /// Check whether the identity key contains the bracketed `[target]` fragment
    pub fn matches_fragment(&self, target: &str) -> bool {
        self.identity_key.contains(&bracket(target))
    }

    /// Check whether an exclusion target names this pack
    pub fn matches_target(&self, target: &str) -> bool {
        self.label == target || self.matches_fragment(target)
    }

    /// Copy of this pack with the pack flag and every member flag set to `enabled`
    pub fn with_enabled(&self, enabled: bool) -> Self {
        let mut pack = self.clone();
        pack.enabled = enabled;
        for member in &mut pack.members {
            member.enabled = enabled;
        }
        pack
    }
}

fn bracket(target: &str) -> String {
    format!("[{}]", target)
}
