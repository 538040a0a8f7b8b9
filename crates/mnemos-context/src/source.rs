//! Pluggable read interface between strategies and storage.
//!
//! Strategies see storage only through [`MemorySource`], so tests can
//! substitute a failing or instrumented implementation and the assembler
//! stays decoupled from the concrete store.

use mnemos_store::MemoryStore;
use mnemos_types::{DecisionRecord, EntryType, MemoryEntry, PartialEntry};

use crate::error::StrategyError;

/// Read operations the retrieval strategies need.
///
/// All implementations must be `Send + Sync`; strategies run as concurrent
/// tasks over a shared source.
pub trait MemorySource: Send + Sync {
    /// Full-text query over indexed fields, capped by the index.
    fn fulltext(&self, text: &str) -> Result<Vec<String>, StrategyError>;

    /// Case-normalized substring query over entry content.
    fn substring(&self, term: &str) -> Result<Vec<PartialEntry>, StrategyError>;

    /// Recent decisions with decoded payloads, newest first.
    fn recent_decisions(&self, limit: usize) -> Result<Vec<DecisionRecord>, StrategyError>;

    /// Recent raw entries of a type, newest first.
    fn recent_entries(
        &self,
        entry_type: EntryType,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, StrategyError>;
}

impl MemorySource for MemoryStore {
    fn fulltext(&self, text: &str) -> Result<Vec<String>, StrategyError> {
        self.query_fulltext(text)
            .map_err(|e| StrategyError::Source(e.to_string()))
    }

    fn substring(&self, term: &str) -> Result<Vec<PartialEntry>, StrategyError> {
        self.query_substring(term)
            .map_err(|e| StrategyError::Source(e.to_string()))
    }

    fn recent_decisions(&self, limit: usize) -> Result<Vec<DecisionRecord>, StrategyError> {
        MemoryStore::recent_decisions(self, limit).map_err(|e| StrategyError::Source(e.to_string()))
    }

    fn recent_entries(
        &self,
        entry_type: EntryType,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, StrategyError> {
        self.get_recent(entry_type, limit)
            .map_err(|e| StrategyError::Source(e.to_string()))
    }
}
