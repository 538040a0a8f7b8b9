//! The assembled context bundle returned by a query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DecisionRecord, EntryType, Timestamp};

/// A partial entry returned by substring search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialEntry {
    pub id: String,
    pub entry_type: EntryType,
    /// Content truncated for prompt embedding.
    pub excerpt: String,
    /// Constant weight; substring search carries no true ranking.
    pub relevance: f32,
}

/// A pattern entry matched by the similarity strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub id: String,
    pub entry_type: EntryType,
    pub excerpt: String,
    pub similarity: f32,
}

/// Summary of a success or failure pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f32>,
}

/// A potential conflict between the query and an active decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub decision_id: String,
    pub decision_title: String,
    pub conflict_score: f32,
    pub recommendation: String,
}

/// Dependency context for a task query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DependencyContext {
    pub prerequisites: Vec<String>,
    pub dependents: Vec<String>,
    pub potential_blockers: Vec<String>,
    pub estimated_dependencies: usize,
}

/// The bundle returned by a context query.
///
/// Transient and read-only: rebuilt on every query (subject to a short
/// TTL cache), never persisted as its own entity. Every field is always
/// present; a strategy that failed or found nothing contributes its
/// empty value. Maps are `BTreeMap` so serialized bundles are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryContext {
    pub direct_references: Vec<String>,
    pub pattern_matches: Vec<PatternMatch>,
    pub recent_decisions: Vec<DecisionRecord>,
    pub dependency_context: DependencyContext,
    pub conflict_warnings: Vec<ConflictWarning>,
    pub success_patterns: Vec<PatternSummary>,
    pub failure_patterns: Vec<PatternSummary>,
    pub stakeholder_context: BTreeMap<String, String>,
    /// Named scores in [0,1]. An empty category contributes no key;
    /// callers must treat a missing key as "no signal", not zero.
    pub relevance_scores: BTreeMap<String, f32>,
    pub timestamp: Timestamp,
}

impl MemoryContext {
    /// The documented all-empty shape, stamped with the given time.
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            direct_references: Vec::new(),
            pattern_matches: Vec::new(),
            recent_decisions: Vec::new(),
            dependency_context: DependencyContext::default(),
            conflict_warnings: Vec::new(),
            success_patterns: Vec::new(),
            failure_patterns: Vec::new(),
            stakeholder_context: BTreeMap::new(),
            relevance_scores: BTreeMap::new(),
            timestamp,
        }
    }

    /// True when no category holds any result.
    pub fn is_empty(&self) -> bool {
        self.direct_references.is_empty()
            && self.pattern_matches.is_empty()
            && self.recent_decisions.is_empty()
            && self.dependency_context == DependencyContext::default()
            && self.conflict_warnings.is_empty()
            && self.success_patterns.is_empty()
            && self.failure_patterns.is_empty()
            && self.stakeholder_context.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::now;

    #[test]
    fn empty_context_has_no_results() {
        let ctx = MemoryContext::empty(now());
        assert!(ctx.is_empty());
        assert!(ctx.relevance_scores.is_empty());
    }

    #[test]
    fn context_serializes_deterministically() {
        let mut ctx = MemoryContext::empty(now());
        ctx.relevance_scores.insert("decisions".to_string(), 0.4);
        ctx.relevance_scores
            .insert("direct_references".to_string(), 0.2);

        let a = serde_json::to_string(&ctx).unwrap();
        let b = serde_json::to_string(&ctx.clone()).unwrap();
        assert_eq!(a, b);
        // BTreeMap keys come out sorted
        assert!(a.find("decisions").unwrap() < a.find("direct_references").unwrap());
    }
}
