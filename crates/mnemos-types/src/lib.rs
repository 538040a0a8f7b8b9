//! Shared types for the mnemos project-memory assistant.

pub mod context;
pub mod decision;
pub mod entry;
pub mod id;

pub use context::{
    ConflictWarning, DependencyContext, MemoryContext, PartialEntry, PatternMatch, PatternSummary,
};
pub use decision::{Decision, DecisionOption, DecisionRecord, DecisionStatus, Interaction};
pub use entry::{EntryType, EntryTypeParseError, MemoryEntry};
pub use id::generate_entry_id;

use chrono::{DateTime, Utc};

/// Timestamp type used across the workspace.
pub type Timestamp = DateTime<Utc>;

/// Current time, UTC.
pub fn now() -> Timestamp {
    Utc::now()
}
