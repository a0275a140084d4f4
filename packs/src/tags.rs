//! Tag grammar for record names
//!
//! A pack record name looks like
//! `[DLC][角色][Vivira][!Rival][<Base]Vivira - main body(K1nn - v2)`:
//!
//! - `[DLC][<category>][<label>]` is the identity prefix
//! - `[!X]`, `[>X]`, `[<X]` are exclusion, replacement and prerequisite targets
//! - the last trailing `(author - info)` group is author metadata
//!
//! Everything here is stateless; grouping and rules live elsewhere.

use crate::Result;
use model::{Category, Record};
use once_cell::sync::Lazy;
use regex::Regex;

/// Selects every record that belongs to this subsystem
pub static DLC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[DLC\]").expect("valid DLC regex"));

static IDENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\[DLC\]\[([^\]]+)\]\[([^\]]+)\])").expect("valid identity regex")
});

static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[DLC\]\[[^\]]+\]\[([^\]]+)\]").expect("valid label regex"));

static EXCLUSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[!([^\]]+)\]").expect("valid exclusion regex"));

static REPLACEMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[>([^\]]+)\]").expect("valid replacement regex"));

static PREREQUISITE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[<([^\]]+)\]").expect("valid prerequisite regex"));

static AUTHOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("valid author regex"));

/// Kind of relationship tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// `[!X]`: turning this pack on forces packs matching X off
    Exclusion,
    /// `[>X]`: records matching X are suppressed while this pack is on
    Replacement,
    /// `[<X]`: a pack matching X must be selected first
    Prerequisite,
}

impl TargetKind {
    pub fn all() -> [TargetKind; 3] {
        [
            TargetKind::Exclusion,
            TargetKind::Replacement,
            TargetKind::Prerequisite,
        ]
    }

    /// Marker character following the opening bracket
    pub fn marker(&self) -> char {
        match self {
            TargetKind::Exclusion => '!',
            TargetKind::Replacement => '>',
            TargetKind::Prerequisite => '<',
        }
    }

    pub fn from_marker(c: char) -> Option<Self> {
        Self::all().into_iter().find(|k| k.marker() == c)
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            TargetKind::Exclusion => &EXCLUSION_PATTERN,
            TargetKind::Replacement => &REPLACEMENT_PATTERN,
            TargetKind::Prerequisite => &PREREQUISITE_PATTERN,
        }
    }
}

/// Author metadata taken from a trailing parenthetical
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorInfo {
    pub author: String,
    pub info: String,
}

/// Structured view of one record name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub identity_key: String,
    pub category: Category,
    pub label: String,
    pub exclusion_targets: Vec<String>,
    pub replacement_targets: Vec<String>,
    pub prerequisite_targets: Vec<String>,
}

/// Parse a full record name, or `None` if it has no valid identity.
pub fn parse_name(name: &str) -> Option<ParsedName> {
    let identity_key = parse_identity(name)?;
    let category = parse_category(name)?;
    Some(ParsedName {
        identity_key: identity_key.to_string(),
        category,
        label: parse_label(identity_key).to_string(),
        exclusion_targets: extract_targets(name, TargetKind::Exclusion),
        replacement_targets: extract_targets(name, TargetKind::Replacement),
        prerequisite_targets: extract_targets(name, TargetKind::Prerequisite),
    })
}

/// Extract the `[DLC][category][label]` prefix
pub fn parse_identity(name: &str) -> Option<&str> {
    IDENTITY_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract and validate the category bracket
pub fn parse_category(name: &str) -> Option<Category> {
    IDENTITY_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(2))
        .and_then(|m| Category::from_tag(m.as_str()))
}

/// Third bracket of an identity key, or the whole key if it cannot be found
pub fn parse_label(identity_key: &str) -> &str {
    LABEL_PATTERN
        .captures(identity_key)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(identity_key)
}

/// Every target of `kind` in order of appearance, duplicates kept
pub fn extract_targets(name: &str, kind: TargetKind) -> Vec<String> {
    kind.pattern()
        .captures_iter(name)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Union of `kind` targets across records, de-duplicated, first occurrence wins
pub fn merged_targets(records: &[Record], kind: TargetKind) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for record in records {
        for target in extract_targets(&record.name, kind) {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }
    targets
}

/// Author and info from the first record carrying a trailing parenthetical
pub fn extract_author_info(records: &[Record]) -> AuthorInfo {
    records
        .iter()
        .find_map(|r| author_text(&r.name))
        .map(split_author_info)
        .unwrap_or_default()
}

/// Content of the last `(...)` group that is followed only by paren-free text
fn author_text(name: &str) -> Option<&str> {
    let caps = AUTHOR_PATTERN.captures_iter(name).last()?;
    let whole = caps.get(0)?;
    if name[whole.end()..].contains(|c| c == '(' || c == ')') {
        return None;
    }
    caps.get(1).map(|m| m.as_str())
}

fn split_author_info(text: &str) -> AuthorInfo {
    let text = text.trim();
    match text.find('-') {
        Some(idx) if idx > 0 => AuthorInfo {
            author: text[..idx].trim().to_string(),
            info: text[idx + 1..].trim().to_string(),
        },
        _ => AuthorInfo {
            author: text.to_string(),
            info: String::new(),
        },
    }
}

/// Bracketed fragment `[target]` used to match record names
pub fn target_fragment(target: &str) -> String {
    format!("[{}]", target)
}

/// Literal pattern matching `[target]` anywhere in a name
pub fn target_pattern(target: &str) -> Result<Regex> {
    Ok(Regex::new(&regex::escape(&target_fragment(target)))?)
}
