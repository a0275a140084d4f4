use crate::FeaturePack;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Staged enable state per pack identity key.
///
/// Absent keys read as `false`. Operations that change a selection return a
/// new value; nothing in this crate mutates a selection it did not create.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Selection {
    states: IndexMap<String, bool>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial selection mirroring each pack's committed state
    pub fn from_packs(packs: &[FeaturePack]) -> Self {
        packs
            .iter()
            .map(|p| (p.identity_key.clone(), p.enabled))
            .collect()
    }

    pub fn get(&self, key: &str) -> bool {
        self.states.get(key).copied().unwrap_or(false)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.states.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, enabled: bool) {
        self.states.insert(key.into(), enabled);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.states.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Check whether any pack's committed state differs from its staged state
    pub fn differs_from(&self, packs: &[FeaturePack]) -> bool {
        packs.iter().any(|p| self.get(&p.identity_key) != p.enabled)
    }

    /// Packs whose staged state differs from the committed one, with the staged value
    pub fn changes<'a>(&self, packs: &'a [FeaturePack]) -> Vec<(&'a FeaturePack, bool)> {
        packs
            .iter()
            .filter_map(|p| {
                let staged = self.get(&p.identity_key);
                (staged != p.enabled).then_some((p, staged))
            })
            .collect()
    }
}

impl FromIterator<(String, bool)> for Selection {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}
