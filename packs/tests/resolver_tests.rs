//! Tests for the toggle engine

use dlcman_packs::{build_packs, toggle, FeaturePack, Record, Selection};
use pretty_assertions::assert_eq;

fn load(names: &[(&str, bool)]) -> (Vec<FeaturePack>, Selection) {
    let records: Vec<Record> = names.iter().map(|(n, e)| Record::new(*n, *e)).collect();
    build_packs(&records)
}

mod prerequisite_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prerequisite_gate() {
        let (packs, selection) = load(&[("[DLC][角色][A][<B]", false), ("[DLC][角色][B]", false)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");

        assert!(!outcome.success);
        assert_eq!(outcome.missing_prerequisites, Some(vec!["B".to_string()]));
        assert_eq!(outcome.selection, selection);
        assert!(outcome.error.unwrap().contains('B'));
    }

    #[test]
    fn test_prerequisite_satisfied_by_staged_selection() {
        let (packs, selection) = load(&[("[DLC][角色][A][<B]", false), ("[DLC][事件][B]", false)]);

        let with_b = toggle(&selection, &packs, "[DLC][事件][B]");
        assert!(with_b.success);

        let with_a = toggle(&with_b.selection, &packs, "[DLC][角色][A]");
        assert!(with_a.success);
        assert!(with_a.selection.get("[DLC][角色][A]"));
    }

    #[test]
    fn test_multiple_missing_reported_together() {
        let (packs, selection) = load(&[
            ("[DLC][角色][A][<B][<Ghost]", false),
            ("[DLC][角色][B]", false),
        ]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert_eq!(
            outcome.missing_prerequisites,
            Some(vec!["B".to_string(), "Ghost".to_string()])
        );
        assert_eq!(
            outcome.error.as_deref(),
            Some("missing prerequisites: B, Ghost")
        );
    }

    #[test]
    fn test_prerequisite_matches_category_fragment() {
        // [<扩展] is satisfied by the first extension pack in canonical order
        let (packs, selection) = load(&[("[DLC][角色][A][<扩展]", false), ("[DLC][扩展][Map]", true)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert!(outcome.success);
    }
}

mod exclusion_tests {
    use super::*;

    #[test]
    fn test_exclusion_cascade() {
        let (packs, selection) = load(&[("[DLC][角色][A][!B]", false), ("[DLC][角色][B]", true)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");

        assert!(outcome.success);
        assert!(outcome.selection.get("[DLC][角色][A]"));
        assert!(!outcome.selection.get("[DLC][角色][B]"));
    }

    #[test]
    fn test_exclusion_crosses_categories() {
        let (packs, selection) = load(&[
            ("[DLC][角色][A][!Storm]", false),
            ("[DLC][事件][Storm]", true),
            ("[DLC][扩展][Storm]", true),
        ]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert!(!outcome.selection.get("[DLC][事件][Storm]"));
        assert!(!outcome.selection.get("[DLC][扩展][Storm]"));
    }

    #[test]
    fn test_disabling_does_not_apply_exclusions() {
        let (packs, selection) = load(&[("[DLC][角色][A][!B]", true), ("[DLC][角色][B]", true)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert!(!outcome.selection.get("[DLC][角色][A]"));
        assert!(outcome.selection.get("[DLC][角色][B]"));
    }
}

mod cascade_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_disable_cascades_one_level() {
        let (packs, selection) = load(&[
            ("[DLC][角色][A]", true),
            ("[DLC][角色][B][<A]", true),
            ("[DLC][角色][C][<B]", true),
        ]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");

        assert!(!outcome.selection.get("[DLC][角色][B]"));
        // not transitive
        assert!(outcome.selection.get("[DLC][角色][C]"));
    }

    #[test]
    fn test_cascade_skips_unselected_dependents() {
        let (packs, selection) = load(&[("[DLC][角色][A]", true), ("[DLC][角色][B][<A]", false)]);
        let outcome = toggle(&selection, &packs, "[DLC][角色][A]");
        assert!(!outcome.selection.get("[DLC][角色][B]"));
        assert_eq!(outcome.selection.len(), 2);
    }
}

mod purity_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inputs_untouched_and_deterministic() {
        let (packs, selection) = load(&[
            ("[DLC][角色][A][!B]", false),
            ("[DLC][角色][B]", true),
            ("[DLC][角色][C][<B]", true),
        ]);
        let packs_before = packs.clone();
        let selection_before = selection.clone();

        let first = toggle(&selection, &packs, "[DLC][角色][A]");
        let second = toggle(&selection, &packs, "[DLC][角色][A]");

        assert_eq!(first, second);
        assert_eq!(packs, packs_before);
        assert_eq!(selection, selection_before);
    }
}
