use serde::{Deserialize, Serialize};

/// A single named entry in a record store document.
///
/// The name carries all of the structure this crate cares about: a run of
/// bracketed tags followed by free text, e.g.
/// `[DLC][角色][Vivira][!Rival]Vivira - main body(K1nn - v2)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    /// Full record name including tags
    pub name: String,
    /// Whether the host currently has this record switched on
    pub enabled: bool,
}

impl Record {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

/// A staged change to one record's enabled flag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordUpdate {
    pub name: String,
    pub enabled: bool,
}

impl RecordUpdate {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

impl From<&Record> for RecordUpdate {
    fn from(record: &Record) -> Self {
        Self::new(record.name.clone(), record.enabled)
    }
}
