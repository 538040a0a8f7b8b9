//! Context assembly for the mnemos project-memory assistant.
//!
//! Given a free-text query, this crate answers "what does memory know
//! that's relevant to this?" by fanning several retrieval strategies out
//! concurrently over the entry store, merging their outputs into one
//! [`mnemos_types::MemoryContext`] bundle, and reducing the results to a
//! small map of named relevance scores.
//!
//! # Resilience
//!
//! Each strategy returns `Result<T, StrategyError>`; a failing strategy
//! degrades to its category's empty value at the merge point, so a context
//! query never fails past the retrieval boundary. The purpose is "best
//! available context", not "guaranteed-complete context".
//!
//! # Caching
//!
//! Identical queries inside a short TTL window return the previously
//! computed bundle without re-running strategies. Expiry is strictly
//! elapsed wall-clock time; writes do not invalidate cached bundles.

pub mod cache;
pub mod engine;
pub mod error;
pub mod format;
pub mod keywords;
pub mod metrics;
pub mod scorer;
pub mod similarity;
pub mod source;

pub use cache::TtlCache;
pub use engine::{Category, CategoryFilter, ContextEngine};
pub use error::StrategyError;
pub use format::format_for_prompt;
pub use keywords::extract_key_terms;
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use scorer::score_categories;
pub use similarity::{find_similar, keyword_overlap};
pub use source::MemorySource;
