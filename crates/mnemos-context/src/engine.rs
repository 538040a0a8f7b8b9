//! Concurrent context assembly.
//!
//! [`ContextEngine`] fans seven retrieval strategies out over the entry
//! store, merges their outputs into one [`MemoryContext`], scores the
//! populated categories, and caches the bundle for identical queries
//! inside a short TTL window.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use mnemos_config::Settings;
use mnemos_types::{
    ConflictWarning, DecisionRecord, DecisionStatus, DependencyContext, EntryType, MemoryContext,
    PatternMatch, PatternSummary, now,
};

use crate::cache::TtlCache;
use crate::error::StrategyError;
use crate::keywords::extract_key_terms;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::scorer::score_categories;
use crate::similarity::find_similar;
use crate::source::MemorySource;

/// How many recent decisions each decision-reading strategy scans.
const DECISION_SCAN: usize = 20;

/// How many recent task/pattern entries the similarity strategies scan.
const ENTRY_SCAN: usize = 50;

/// Relevant decisions kept after filtering.
const MAX_RELEVANT_DECISIONS: usize = 5;

/// Success/failure patterns kept per list.
const MAX_OUTCOME_PATTERNS: usize = 5;

/// Conflict score a decision must exceed to produce a warning.
const CONFLICT_THRESHOLD: f32 = 0.5;

/// One retrieval category of the assembled context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    DirectReferences,
    PatternMatches,
    Decisions,
    Dependencies,
    Conflicts,
    OutcomePatterns,
    Stakeholders,
}

impl Category {
    const ALL: [Category; 7] = [
        Category::DirectReferences,
        Category::PatternMatches,
        Category::Decisions,
        Category::Dependencies,
        Category::Conflicts,
        Category::OutcomePatterns,
        Category::Stakeholders,
    ];

    fn bit(self) -> u8 {
        match self {
            Category::DirectReferences => 1 << 0,
            Category::PatternMatches => 1 << 1,
            Category::Decisions => 1 << 2,
            Category::Dependencies => 1 << 3,
            Category::Conflicts => 1 << 4,
            Category::OutcomePatterns => 1 << 5,
            Category::Stakeholders => 1 << 6,
        }
    }
}

/// Selects which categories a query assembles. Defaults to all.
///
/// Excluded categories contribute their empty value; the bundle shape
/// never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryFilter(u8);

impl CategoryFilter {
    /// Every category.
    pub fn all() -> Self {
        let mut bits = 0;
        for cat in Category::ALL {
            bits |= cat.bit();
        }
        Self(bits)
    }

    /// Only the named categories.
    pub fn only(categories: &[Category]) -> Self {
        let mut bits = 0;
        for cat in categories {
            bits |= cat.bit();
        }
        Self(bits)
    }

    /// Whether a category is selected.
    pub fn includes(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Assembles memory context for free-text queries.
///
/// Owns its caches and counters; construct one per store. Strategies
/// reach storage only through the injected [`MemorySource`].
pub struct ContextEngine {
    source: Arc<dyn MemorySource>,
    settings: Settings,
    context_cache: TtlCache<(String, CategoryFilter), MemoryContext>,
    term_cache: TtlCache<String, Vec<String>>,
    metrics: EngineMetrics,
}

impl ContextEngine {
    pub fn new(source: Arc<dyn MemorySource>, settings: Settings) -> Self {
        let context_cache = TtlCache::new(settings.context_cache_ttl);
        let term_cache = TtlCache::new(settings.term_cache_ttl);
        Self {
            source,
            settings,
            context_cache,
            term_cache,
            metrics: EngineMetrics::new(),
        }
    }

    /// Assemble context for a query across every category.
    pub async fn get_relevant_context(&self, query: &str) -> MemoryContext {
        self.get_relevant_context_filtered(query, CategoryFilter::all())
            .await
    }

    /// Assemble context for a query, restricted to the filtered categories.
    ///
    /// Never fails: a failing strategy degrades to its category's empty
    /// value, and an empty store produces the all-empty bundle.
    pub async fn get_relevant_context_filtered(
        &self,
        query: &str,
        filter: CategoryFilter,
    ) -> MemoryContext {
        let key = (query.to_string(), filter);
        if let Some(cached) = self.context_cache.get(&key) {
            debug!(query, "context cache hit");
            self.metrics.record_cache_hit();
            return cached;
        }

        let terms = extract_key_terms(query);

        let (direct, patterns, decisions, dependencies, conflicts, outcomes, stakeholders) = tokio::join!(
            self.direct_references(&terms, filter),
            self.pattern_matches(query, filter),
            self.relevant_decisions(&terms, filter),
            self.dependency_context(filter),
            self.conflict_warnings(&terms, filter),
            self.outcome_patterns(&terms, filter),
            self.stakeholder_context(filter),
        );

        let mut context = MemoryContext::empty(now());
        context.direct_references = self.resolve("direct_references", direct);
        context.pattern_matches = self.resolve("pattern_matches", patterns);
        context.recent_decisions = self.resolve("decisions", decisions);
        context.dependency_context = self.resolve("dependencies", dependencies);
        context.conflict_warnings = self.resolve("conflicts", conflicts);
        let (success, failure) = self.resolve("outcome_patterns", outcomes);
        context.success_patterns = success;
        context.failure_patterns = failure;
        context.stakeholder_context = self.resolve("stakeholders", stakeholders);

        context.relevance_scores = score_categories(
            &context.direct_references,
            &context.pattern_matches,
            &context.recent_decisions,
        );

        self.metrics.record_assembly();
        self.context_cache.insert(key, context.clone());
        context
    }

    /// Counter values for tests and the stats surface.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn resolve<T: Default>(&self, category: &'static str, result: Result<T, StrategyError>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                warn!(category, %err, "strategy failed, degrading to empty");
                self.metrics.record_strategy_failure();
                T::default()
            }
        }
    }

    /// Per-term fulltext lookups, merged and deduplicated in term order.
    /// Individual term results live in the longer-lived term cache. A term
    /// the index rejects falls back to a substring scan.
    async fn direct_references(
        &self,
        terms: &[String],
        filter: CategoryFilter,
    ) -> Result<Vec<String>, StrategyError> {
        if !filter.includes(Category::DirectReferences) {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut refs = Vec::new();
        for term in terms {
            let hits = match self.term_cache.get(term) {
                Some(hits) => hits,
                None => {
                    let hits = match self.source.fulltext(term) {
                        Ok(hits) => hits,
                        Err(err) => {
                            debug!(term, %err, "fulltext failed, scanning by substring");
                            self.source
                                .substring(term)?
                                .into_iter()
                                .map(|p| p.excerpt)
                                .collect()
                        }
                    };
                    self.term_cache.insert(term.clone(), hits.clone());
                    hits
                }
            };
            for hit in hits {
                if refs.len() >= self.settings.fulltext_limit {
                    return Ok(refs);
                }
                if seen.insert(hit.clone()) {
                    refs.push(hit);
                }
            }
        }
        Ok(refs)
    }

    /// Similarity over recent task and pattern entries.
    async fn pattern_matches(
        &self,
        query: &str,
        filter: CategoryFilter,
    ) -> Result<Vec<PatternMatch>, StrategyError> {
        if !filter.includes(Category::PatternMatches) {
            return Ok(Vec::new());
        }

        let mut candidates = self.source.recent_entries(EntryType::Task, ENTRY_SCAN)?;
        candidates.extend(self.source.recent_entries(EntryType::Pattern, ENTRY_SCAN)?);
        Ok(find_similar(query, &candidates))
    }

    /// Recent decisions filtered by query-term overlap.
    async fn relevant_decisions(
        &self,
        terms: &[String],
        filter: CategoryFilter,
    ) -> Result<Vec<DecisionRecord>, StrategyError> {
        if !filter.includes(Category::Decisions) {
            return Ok(Vec::new());
        }

        let decisions = self.source.recent_decisions(DECISION_SCAN)?;
        Ok(filter_decisions(terms, decisions))
    }

    async fn dependency_context(
        &self,
        filter: CategoryFilter,
    ) -> Result<DependencyContext, StrategyError> {
        if !filter.includes(Category::Dependencies) {
            return Ok(DependencyContext::default());
        }

        // Task dependency graphs are not tracked yet; the category
        // participates in assembly with its empty shape.
        Ok(DependencyContext::default())
    }

    /// Scan active decisions for conflicts with the query.
    async fn conflict_warnings(
        &self,
        terms: &[String],
        filter: CategoryFilter,
    ) -> Result<Vec<ConflictWarning>, StrategyError> {
        if !filter.includes(Category::Conflicts) {
            return Ok(Vec::new());
        }

        let decisions = self.source.recent_decisions(DECISION_SCAN)?;
        let warnings = decisions
            .into_iter()
            .filter(|d| {
                matches!(
                    d.decision.status,
                    DecisionStatus::Pending | DecisionStatus::Approved
                )
            })
            .filter_map(|d| {
                let score = conflict_score(terms, &d);
                if score > CONFLICT_THRESHOLD {
                    let recommendation =
                        format!("Review decision '{}' before proceeding", d.decision.title);
                    Some(ConflictWarning {
                        decision_id: d.id,
                        decision_title: d.decision.title,
                        conflict_score: score,
                        recommendation,
                    })
                } else {
                    None
                }
            })
            .collect();
        Ok(warnings)
    }

    /// Success and failure pattern summaries matching the query terms.
    async fn outcome_patterns(
        &self,
        terms: &[String],
        filter: CategoryFilter,
    ) -> Result<(Vec<PatternSummary>, Vec<PatternSummary>), StrategyError> {
        if !filter.includes(Category::OutcomePatterns) {
            return Ok((Vec::new(), Vec::new()));
        }

        let entries = self.source.recent_entries(EntryType::Pattern, ENTRY_SCAN)?;
        let mut success = Vec::new();
        let mut failure = Vec::new();
        for entry in entries {
            let summary: PatternSummary = match serde_json::from_str(&entry.content) {
                Ok(s) => s,
                Err(err) => {
                    warn!(id = %entry.id, %err, "skipping undecodable pattern entry");
                    continue;
                }
            };

            let description = summary.description.to_lowercase();
            if !terms.is_empty() && !terms.iter().any(|t| description.contains(t.as_str())) {
                continue;
            }

            if entry.tags.contains("failure") {
                if failure.len() < MAX_OUTCOME_PATTERNS {
                    failure.push(summary);
                }
            } else if entry.tags.contains("success") && success.len() < MAX_OUTCOME_PATTERNS {
                success.push(summary);
            }
        }
        Ok((success, failure))
    }

    async fn stakeholder_context(
        &self,
        filter: CategoryFilter,
    ) -> Result<BTreeMap<String, String>, StrategyError> {
        if !filter.includes(Category::Stakeholders) {
            return Ok(BTreeMap::new());
        }

        // Stakeholder preferences are not recorded anywhere yet.
        Ok(BTreeMap::new())
    }
}

/// Keep decisions whose title + context contains at least one query term,
/// ranked by match count then recency, top five.
fn filter_decisions(terms: &[String], decisions: Vec<DecisionRecord>) -> Vec<DecisionRecord> {
    let mut relevant: Vec<DecisionRecord> = decisions
        .into_iter()
        .filter_map(|mut record| {
            let haystack =
                format!("{} {}", record.decision.title, record.decision.context).to_lowercase();
            let count = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
            if count == 0 {
                None
            } else {
                record.match_count = count;
                Some(record)
            }
        })
        .collect();

    relevant.sort_by(|a, b| {
        b.match_count
            .cmp(&a.match_count)
            .then(b.timestamp.cmp(&a.timestamp))
    });
    relevant.truncate(MAX_RELEVANT_DECISIONS);
    relevant
}

/// Conflict strength between the query and an active decision.
fn conflict_score(_terms: &[String], _decision: &DecisionRecord) -> f32 {
    // No scoring heuristic is wired up yet; active decisions are scanned
    // but nothing crosses the threshold.
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mnemos_store::MemoryStore;
    use mnemos_types::{Decision, DecisionOption, MemoryEntry};

    fn sample_decision(title: &str, context: &str) -> Decision {
        Decision::new(
            title.to_string(),
            context.to_string(),
            vec![DecisionOption {
                name: "Option A".to_string(),
                description: "First option".to_string(),
                pros: None,
                cons: None,
            }],
            "Option A".to_string(),
            "It fits".to_string(),
        )
    }

    fn engine_over(store: MemoryStore) -> ContextEngine {
        ContextEngine::new(Arc::new(store), Settings::for_tests())
    }

    #[tokio::test]
    async fn empty_store_yields_empty_context() {
        let engine = engine_over(MemoryStore::open_in_memory().unwrap());
        let ctx = engine.get_relevant_context("anything at all").await;
        assert!(ctx.is_empty());
        assert!(ctx.relevance_scores.is_empty());
    }

    #[tokio::test]
    async fn stored_decision_is_retrievable_by_title_terms() {
        let store = MemoryStore::open_in_memory().unwrap();
        store
            .store_decision(&sample_decision(
                "Database Choice",
                "Need to select a database",
            ))
            .unwrap();

        let engine = engine_over(store);
        let ctx = engine.get_relevant_context("database selection").await;

        assert_eq!(ctx.recent_decisions.len(), 1);
        assert_eq!(ctx.recent_decisions[0].decision.title, "Database Choice");
        assert_eq!(ctx.recent_decisions[0].decision.rationale, "It fits");
        assert!(!ctx.direct_references.is_empty());
        assert!(ctx.relevance_scores.contains_key("decisions"));
        assert!(ctx.relevance_scores.contains_key("direct_references"));
        // No patterns stored, so no pattern score key
        assert!(!ctx.relevance_scores.contains_key("pattern_matches"));
    }

    #[tokio::test]
    async fn decision_filter_ranks_overlap_and_excludes_zero() {
        let store = MemoryStore::open_in_memory().unwrap();
        store
            .store_decision(&sample_decision("UI Framework", "Need a frontend"))
            .unwrap();
        store
            .store_decision(&sample_decision(
                "Database Choice",
                "Need to select database",
            ))
            .unwrap();

        let engine = engine_over(store);
        let ctx = engine.get_relevant_context("database selection").await;

        assert_eq!(ctx.recent_decisions.len(), 1);
        assert_eq!(ctx.recent_decisions[0].decision.title, "Database Choice");
        assert!(ctx.recent_decisions[0].match_count > 0);
    }

    #[tokio::test]
    async fn category_filter_suppresses_unselected_categories() {
        let store = MemoryStore::open_in_memory().unwrap();
        store
            .store_decision(&sample_decision(
                "Database Choice",
                "Need to select database",
            ))
            .unwrap();

        let engine = engine_over(store);
        let ctx = engine
            .get_relevant_context_filtered(
                "database selection",
                CategoryFilter::only(&[Category::Decisions]),
            )
            .await;

        assert_eq!(ctx.recent_decisions.len(), 1);
        assert!(ctx.direct_references.is_empty());
        assert!(!ctx.relevance_scores.contains_key("direct_references"));
    }

    #[tokio::test]
    async fn outcome_patterns_split_by_tag() {
        let store = MemoryStore::open_in_memory().unwrap();
        store
            .store_pattern("Incremental database migration works well", "success", Some(0.9))
            .unwrap();
        store
            .store_pattern("Big-bang database rewrites stall", "failure", None)
            .unwrap();
        store
            .store_pattern("Unrelated gardening routine", "success", None)
            .unwrap();

        let engine = engine_over(store);
        let ctx = engine.get_relevant_context("database migration plan").await;

        assert_eq!(ctx.success_patterns.len(), 1);
        assert!(ctx.success_patterns[0].description.contains("Incremental"));
        assert_eq!(ctx.success_patterns[0].success_rate, Some(0.9));
        assert_eq!(ctx.failure_patterns.len(), 1);
        assert!(ctx.failure_patterns[0].description.contains("Big-bang"));
    }

    /// Delegates to a real store but fails task-entry reads, knocking out
    /// the pattern-similarity strategy while every other strategy works.
    struct FailingTaskSource {
        store: MemoryStore,
    }

    impl MemorySource for FailingTaskSource {
        fn fulltext(&self, text: &str) -> Result<Vec<String>, StrategyError> {
            MemorySource::fulltext(&self.store, text)
        }

        fn substring(
            &self,
            term: &str,
        ) -> Result<Vec<mnemos_types::PartialEntry>, StrategyError> {
            MemorySource::substring(&self.store, term)
        }

        fn recent_decisions(&self, limit: usize) -> Result<Vec<DecisionRecord>, StrategyError> {
            MemorySource::recent_decisions(&self.store, limit)
        }

        fn recent_entries(
            &self,
            entry_type: EntryType,
            limit: usize,
        ) -> Result<Vec<MemoryEntry>, StrategyError> {
            if entry_type == EntryType::Task {
                return Err(StrategyError::Source("simulated index outage".to_string()));
            }
            MemorySource::recent_entries(&self.store, entry_type, limit)
        }
    }

    #[tokio::test]
    async fn failing_strategy_degrades_without_aborting() {
        let store = MemoryStore::open_in_memory().unwrap();
        store
            .store_decision(&sample_decision(
                "Database Choice",
                "Need to select database",
            ))
            .unwrap();

        let engine = ContextEngine::new(
            Arc::new(FailingTaskSource { store }),
            Settings::for_tests(),
        );
        let ctx = engine.get_relevant_context("database selection").await;

        assert!(ctx.pattern_matches.is_empty());
        assert!(!ctx.direct_references.is_empty());
        assert_eq!(ctx.recent_decisions.len(), 1);
        assert_eq!(engine.metrics().strategy_failures, 1);
    }

    /// Counts every read so tests can assert the cache short-circuits.
    struct CountingSource {
        store: MemoryStore,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(store: MemoryStore) -> Self {
            Self {
                store,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl MemorySource for CountingSource {
        fn fulltext(&self, text: &str) -> Result<Vec<String>, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            MemorySource::fulltext(&self.store, text)
        }

        fn substring(
            &self,
            term: &str,
        ) -> Result<Vec<mnemos_types::PartialEntry>, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            MemorySource::substring(&self.store, term)
        }

        fn recent_decisions(&self, limit: usize) -> Result<Vec<DecisionRecord>, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            MemorySource::recent_decisions(&self.store, limit)
        }

        fn recent_entries(
            &self,
            entry_type: EntryType,
            limit: usize,
        ) -> Result<Vec<MemoryEntry>, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            MemorySource::recent_entries(&self.store, entry_type, limit)
        }
    }

    #[tokio::test]
    async fn cached_query_returns_identical_bundle_without_rereading() {
        let store = MemoryStore::open_in_memory().unwrap();
        store
            .store_decision(&sample_decision(
                "Database Choice",
                "Need to select database",
            ))
            .unwrap();

        let source = Arc::new(CountingSource::new(store));
        let mut settings = Settings::for_tests();
        settings.context_cache_ttl = std::time::Duration::from_secs(60);
        let engine = ContextEngine::new(source.clone(), settings);

        let first = engine.get_relevant_context("database selection").await;
        let calls_after_first = source.calls.load(Ordering::SeqCst);
        assert!(calls_after_first > 0);

        let second = engine.get_relevant_context("database selection").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), calls_after_first);
        assert_eq!(engine.metrics().cache_hits, 1);
        assert_eq!(engine.metrics().assemblies, 1);

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }
}
