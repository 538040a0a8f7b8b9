//! Counters for context assembly activity.

use std::sync::atomic::{AtomicU64, Ordering};

/// Engine-level counters, shared across concurrent assemblies.
///
/// Held by the engine and incremented during assembly; read via
/// [`EngineMetrics::snapshot`]. There is no global registry: callers
/// that want these numbers hold a reference to the engine.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    assemblies: AtomicU64,
    cache_hits: AtomicU64,
    strategy_failures: AtomicU64,
}

/// A point-in-time copy of the engine counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Contexts assembled from the store (cache misses included).
    pub assemblies: u64,
    /// Requests served from the context cache.
    pub cache_hits: u64,
    /// Individual strategies that failed and were degraded to empty.
    pub strategy_failures: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_assembly(&self) {
        self.assemblies.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_strategy_failure(&self) {
        self.strategy_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters at once.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            assemblies: self.assemblies.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            strategy_failures: self.strategy_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = EngineMetrics::new();
        metrics.record_assembly();
        metrics.record_assembly();
        metrics.record_cache_hit();
        metrics.record_strategy_failure();

        let snap = metrics.snapshot();
        assert_eq!(snap.assemblies, 2);
        assert_eq!(snap.cache_hits, 1);
        assert_eq!(snap.strategy_failures, 1);
    }

    #[test]
    fn fresh_metrics_are_zero() {
        let snap = EngineMetrics::new().snapshot();
        assert_eq!(snap.assemblies, 0);
        assert_eq!(snap.cache_hits, 0);
        assert_eq!(snap.strategy_failures, 0);
    }
}
