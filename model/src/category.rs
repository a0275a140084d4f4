use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a feature pack, taken from the second bracket of its identity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Playable or supporting characters (`角色`)
    Character,
    /// Story events (`事件`)
    Event,
    /// World and rules extensions (`扩展`)
    Extension,
}

impl Category {
    /// Get all categories in display order
    pub fn all() -> [Category; 3] {
        [Category::Character, Category::Event, Category::Extension]
    }

    /// Tag literal used by authored content
    pub fn literal(&self) -> &'static str {
        match self {
            Category::Character => "角色",
            Category::Event => "事件",
            Category::Extension => "扩展",
        }
    }

    /// English alias, also accepted inside tags
    pub fn name(&self) -> &'static str {
        match self {
            Category::Character => "character",
            Category::Event => "event",
            Category::Extension => "extension",
        }
    }

    /// Parse the content of a category bracket.
    ///
    /// Matching is exact; anything other than a known literal or alias is
    /// not a category.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|cat| cat.literal() == tag || cat.name() == tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
