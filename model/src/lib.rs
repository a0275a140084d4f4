//! dlcman data model
//!
//! Plain data shared by the pack engine and its front ends:
//!
//! - [`Record`]: a named, enable-flagged entry read from a record store
//! - [`RecordUpdate`]: a single `{name, enabled}` write staged for a store
//! - [`Category`]: the fixed set of pack categories
//! - [`FeaturePack`]: all records sharing one `[DLC][category][label]` identity
//! - [`Selection`]: the staged, uncommitted enable state per pack

pub mod category;
pub mod pack;
pub mod record;
pub mod selection;

pub use category::Category;
pub use pack::FeaturePack;
pub use record::{Record, RecordUpdate};
pub use selection::Selection;
