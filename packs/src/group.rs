//! Grouping of raw records into feature packs

use crate::tags::{self, TargetKind};
use indexmap::IndexMap;
use model::{Category, FeaturePack, Record, Selection};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Build packs from a flat record list.
///
/// Records without a valid identity or category are skipped. Packs come back
/// in canonical label order together with the matching initial selection.
pub fn build_packs(records: &[Record]) -> (Vec<FeaturePack>, Selection) {
    let mut groups: IndexMap<String, (Category, Vec<Record>)> = IndexMap::new();

    for record in records {
        let Some(identity_key) = tags::parse_identity(&record.name) else {
            continue;
        };
        let Some(category) = tags::parse_category(&record.name) else {
            debug!("Skipping record with unknown category: {}", record.name);
            continue;
        };

        groups
            .entry(identity_key.to_string())
            .or_insert_with(|| (category, Vec::new()))
            .1
            .push(record.clone());
    }

    let packs: Vec<FeaturePack> = groups
        .into_iter()
        .map(|(identity_key, (category, members))| build_pack(identity_key, category, members))
        .collect();

    let packs = sort_packs(packs);
    let selection = Selection::from_packs(&packs);

    debug!(
        "Built {} packs from {} records",
        packs.len(),
        records.len()
    );

    (packs, selection)
}

fn build_pack(identity_key: String, category: Category, members: Vec<Record>) -> FeaturePack {
    let author_info = tags::extract_author_info(&members);

    FeaturePack {
        label: tags::parse_label(&identity_key).to_string(),
        category,
        author: author_info.author,
        info: author_info.info,
        exclusion_targets: tags::merged_targets(&members, TargetKind::Exclusion),
        replacement_targets: tags::merged_targets(&members, TargetKind::Replacement),
        prerequisite_targets: tags::merged_targets(&members, TargetKind::Prerequisite),
        enabled: FeaturePack::aggregate_enabled(&members),
        identity_key,
        members,
    }
}

/// Sort packs into canonical display order by label
pub fn sort_packs(mut packs: Vec<FeaturePack>) -> Vec<FeaturePack> {
    packs.sort_by_cached_key(|p| {
        (
            collation_key(&p.label),
            p.label.clone(),
            p.identity_key.clone(),
        )
    });
    packs
}

/// Width- and case-insensitive comparison key for a label
pub fn collation_key(label: &str) -> String {
    label.nfkc().collect::<String>().to_lowercase()
}
