//! Memory entry types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Timestamp, now};

/// The closed set of entry types the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Decision,
    Conversation,
    Pattern,
    Context,
    Task,
}

impl EntryType {
    /// String form used in the database and in entry id prefixes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decision => "decision",
            Self::Conversation => "conversation",
            Self::Pattern => "pattern",
            Self::Context => "context",
            Self::Task => "task",
        }
    }

    /// All members of the closed set.
    pub fn all() -> &'static [EntryType] {
        &[
            Self::Decision,
            Self::Conversation,
            Self::Pattern,
            Self::Context,
            Self::Task,
        ]
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown entry type string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown entry type: {0}")]
pub struct EntryTypeParseError(pub String);

impl FromStr for EntryType {
    type Err = EntryTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decision" => Ok(Self::Decision),
            "conversation" => Ok(Self::Conversation),
            "pattern" => Ok(Self::Pattern),
            "context" => Ok(Self::Context),
            "task" => Ok(Self::Task),
            other => Err(EntryTypeParseError(other.to_string())),
        }
    }
}

/// The atomic unit of persisted memory.
///
/// Entries are immutable once written; corrections are made by writing a
/// new entry, never by editing the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Unique id, assigned by the store at write time when empty.
    #[serde(default)]
    pub id: String,
    pub entry_type: EntryType,
    /// Serialized payload, typically a JSON-encoded record.
    pub content: String,
    /// Free-text description used for search and relevance.
    #[serde(default)]
    pub context: String,
    /// Comma-separated classification labels.
    #[serde(default)]
    pub tags: String,
    pub timestamp: Timestamp,
    /// Lazily computed per query; stored value defaults to 0.
    #[serde(default)]
    pub relevance_score: f32,
}

impl MemoryEntry {
    /// Create a new entry with an unassigned id and the current timestamp.
    pub fn new(entry_type: EntryType, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            entry_type,
            content: content.into(),
            context: String::new(),
            tags: String::new(),
            timestamp: now(),
            relevance_score: 0.0,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_type_round_trips_through_str() {
        for ty in EntryType::all() {
            assert_eq!(ty.as_str().parse::<EntryType>().unwrap(), *ty);
        }
    }

    #[test]
    fn entry_type_rejects_unknown() {
        assert!("note".parse::<EntryType>().is_err());
    }

    #[test]
    fn new_entry_has_defaults() {
        let entry = MemoryEntry::new(EntryType::Task, "build the parser");
        assert!(entry.id.is_empty());
        assert_eq!(entry.relevance_score, 0.0);
        assert!(entry.tags.is_empty());
    }
}
