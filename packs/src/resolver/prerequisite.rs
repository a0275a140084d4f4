//! Prerequisite gate for enabling a pack

use model::{FeaturePack, Selection};

/// Result of checking a pack's `[<X]` targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteCheck {
    /// Targets with no selected pack, in declaration order
    pub missing: Vec<String>,
}

impl PrerequisiteCheck {
    pub fn satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check each prerequisite against the staged selection.
///
/// A target is satisfied by the first pack (in canonical order) whose identity
/// key contains `[target]`, and only if that pack is selected. Category does
/// not matter.
pub fn check_prerequisites(
    packs: &[FeaturePack],
    selection: &Selection,
    prerequisites: &[String],
) -> PrerequisiteCheck {
    let missing = prerequisites
        .iter()
        .filter(|target| {
            match packs.iter().find(|p| p.matches_fragment(target)) {
                Some(pack) => !selection.get(&pack.identity_key),
                None => true,
            }
        })
        .cloned()
        .collect();

    PrerequisiteCheck { missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Category, Record};

    fn pack(category: Category, label: &str) -> FeaturePack {
        let key = format!("[DLC][{}][{}]", category.literal(), label);
        FeaturePack {
            identity_key: key.clone(),
            category,
            label: label.to_string(),
            author: String::new(),
            info: String::new(),
            exclusion_targets: vec![],
            replacement_targets: vec![],
            prerequisite_targets: vec![],
            members: vec![Record::new(key, false)],
            enabled: false,
        }
    }

    #[test]
    fn test_unknown_target_is_missing() {
        let packs = vec![pack(Category::Character, "A")];
        let check = check_prerequisites(&packs, &Selection::new(), &["Ghost".to_string()]);
        assert_eq!(check.missing, vec!["Ghost"]);
        assert!(!check.satisfied());
    }

    #[test]
    fn test_unselected_target_is_missing() {
        let packs = vec![pack(Category::Character, "A")];
        let selection = Selection::from_packs(&packs);
        let check = check_prerequisites(&packs, &selection, &["A".to_string()]);
        assert_eq!(check.missing, vec!["A"]);
    }

    #[test]
    fn test_selected_target_across_categories() {
        let packs = vec![
            pack(Category::Character, "A"),
            pack(Category::Extension, "Map"),
        ];
        let mut selection = Selection::from_packs(&packs);
        selection.set("[DLC][扩展][Map]", true);

        let check = check_prerequisites(&packs, &selection, &["Map".to_string()]);
        assert!(check.satisfied());
    }

    #[test]
    fn test_missing_keeps_declaration_order() {
        let packs = vec![pack(Category::Event, "B")];
        let targets = vec!["Z".to_string(), "B".to_string(), "A".to_string()];
        let check = check_prerequisites(&packs, &Selection::new(), &targets);
        assert_eq!(check.missing, vec!["Z", "B", "A"]);
    }
}
