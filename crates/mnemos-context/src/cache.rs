//! TTL-bounded in-memory caches for assembled contexts and extracted terms.
//!
//! Entries expire purely by age. A zero TTL disables caching entirely,
//! which the test configuration uses to make every call hit the store.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A mutex-guarded map of values with per-entry insertion timestamps.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, (Instant, V)>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries live for `ttl`. A zero duration
    /// disables the cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a value, returning a clone if present and unexpired.
    /// Expired entries are evicted on access.
    pub fn get(&self, key: &K) -> Option<V> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((inserted, value)) if inserted.elapsed() <= self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert a value, stamping it with the current time.
    pub fn insert(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.lock().insert(key, (Instant::now(), value));
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// The configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn hit_within_ttl() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), 7);
        assert_eq!(cache.get(&"k".to_string()), Some(7));
    }

    #[test]
    fn miss_after_expiry() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_millis(10));
        cache.insert("k".to_string(), 7);

        thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get(&"k".to_string()), None);
        // Expired entry was evicted by the lookup
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::ZERO);
        cache.insert("k".to_string(), 7);
        assert_eq!(cache.get(&"k".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_overwrites_and_restamps() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_millis(40));
        cache.insert("k".to_string(), 1);

        thread::sleep(Duration::from_millis(25));
        cache.insert("k".to_string(), 2);

        thread::sleep(Duration::from_millis(25));
        // Total elapsed exceeds the TTL but the restamp keeps it live
        assert_eq!(cache.get(&"k".to_string()), Some(2));
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
