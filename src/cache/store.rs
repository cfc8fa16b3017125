//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with write-order eviction,
//! lazy TTL expiration and schema version stamps.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, CacheStats, EntryStats, WriteOrderTracker};
use crate::config::CacheConfig;

// == Cache Store ==
/// TTL- and version-aware map from string keys to typed values.
///
/// All operations are total. Stale entries are never swept; they are removed
/// when a read finds them.
#[derive(Debug)]
pub struct CacheStore<T> {
    entries: HashMap<String, CacheEntry<T>>,
    order: WriteOrderTracker,
    counters: CacheCounters,
    config: CacheConfig,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            order: WriteOrderTracker::new(),
            counters: CacheCounters::new(),
            config,
        }
    }

    // == Set ==
    /// Stores a value with an optional TTL (the store default otherwise).
    ///
    /// When the store is at capacity the least recently written entry is
    /// evicted first, even if `key` is already present.
    pub fn set(&mut self, key: impl Into<String>, data: T, ttl: Option<Duration>) {
        let key = key.into();

        if self.entries.len() >= self.config.max_entries {
            if let Some(evicted) = self.order.evict_oldest() {
                self.entries.remove(&evicted);
                self.counters.record_eviction();
                debug!(key = %evicted, "evicted oldest cache entry");
            }
        }

        let ttl = ttl.unwrap_or(self.config.default_ttl);
        let entry = CacheEntry::new(data, ttl, self.config.schema_version.clone());
        self.entries.insert(key.clone(), entry);
        self.order.record_write(&key);
    }

    // == Get ==
    /// Returns the value if present, current-version and within its TTL.
    ///
    /// A stale or version-mismatched entry is deleted on the spot.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let valid = match self.entries.get(key) {
            Some(entry) => entry.is_valid(&self.config.schema_version),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if !valid {
            self.remove_entry(key);
            self.counters.record_miss();
            debug!(key, "dropped stale cache entry");
            return None;
        }

        self.counters.record_hit();
        self.entries.get(key).map(|entry| entry.data.clone())
    }

    // == Has ==
    /// Same as `get(key).is_some()`, including the lazy-expiry side effect.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Delete ==
    /// Removes an entry, returning whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Stats ==
    /// Snapshot of every held entry plus cumulative counters.
    pub fn stats(&self) -> CacheStats {
        let mut items: Vec<EntryStats> = self
            .entries
            .iter()
            .map(|(key, entry)| EntryStats {
                key: key.clone(),
                age_ms: millis(entry.age()),
                ttl_ms: millis(entry.ttl),
            })
            .collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));

        CacheStats {
            size: self.entries.len(),
            max_size: self.config.max_entries,
            version: self.config.schema_version.clone(),
            items,
            counters: self.counters,
        }
    }

    // == Pattern Helpers ==
    /// Keys containing `pattern` as a literal substring.
    pub fn keys_containing(&self, pattern: &str) -> Vec<String> {
        self.stats()
            .items
            .into_iter()
            .filter(|item| item.key.contains(pattern))
            .map(|item| item.key)
            .collect()
    }

    /// Deletes every key containing `pattern`, returning how many were removed.
    pub fn delete_matching(&mut self, pattern: &str) -> usize {
        let mut removed = 0;
        for key in self.keys_containing(pattern) {
            if self.remove_entry(&key) {
                removed += 1;
            }
        }
        removed
    }

    // == Schema Version ==
    /// Changes the schema stamp; every entry written under the old stamp
    /// reads as absent from now on.
    pub fn set_schema_version(&mut self, version: impl Into<String>) {
        self.config.schema_version = version.into();
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }
}

/// Milliseconds as `u64`, saturating for durations too large to fit.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn store(max_entries: usize) -> CacheStore<String> {
        CacheStore::new(CacheConfig::new(max_entries, Duration::from_secs(300), "1"))
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100);

        store.set("movie:603", "The Matrix".to_string(), None);

        assert_eq!(store.get("movie:603"), Some("The Matrix".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.get("nonexistent"), None);
        assert!(!store.has("nonexistent"));
    }

    #[test]
    fn test_store_delete() {
        let mut store = store(100);

        store.set("key1", "value1".to_string(), None);
        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_clear() {
        let mut store = store(100);
        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);

        store.clear();

        assert!(store.is_empty());
        assert!(!store.has("a"));
        assert_eq!(store.stats().items.len(), 0);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);

        store.set("key1", "value1".to_string(), None);
        store.set("key1", "value2".to_string(), None);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration() {
        let mut store = store(100);

        store.set("key1", "value1".to_string(), Some(Duration::from_secs(1)));
        assert!(store.has("key1"));

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key1"), None);
        assert!(!store.stats().contains_key("key1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_default_ttl_applies() {
        let mut store = CacheStore::new(CacheConfig::new(10, Duration::from_secs(5), "1"));

        store.set("user-lists:42", "watchlist".to_string(), None);
        assert_eq!(store.stats().items[0].ttl_ms, 5000);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(!store.has("user-lists:42"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entries_stay_until_read() {
        let mut store = store(100);

        store.set("key1", "value1".to_string(), Some(Duration::from_secs(1)));
        tokio::time::advance(Duration::from_secs(2)).await;

        // No sweeping: still listed until a read finds it stale
        assert!(store.stats().contains_key("key1"));
        assert!(!store.has("key1"));
        assert!(!store.stats().contains_key("key1"));
    }

    #[test]
    fn test_store_version_invalidation() {
        let mut store = store(100);

        store.set("movie:1", "Alien".to_string(), None);
        assert!(store.has("movie:1"));

        store.set_schema_version("2");

        assert_eq!(store.get("movie:1"), None);
        assert_eq!(store.len(), 0);

        store.set("movie:1", "Alien".to_string(), None);
        assert_eq!(store.get("movie:1"), Some("Alien".to_string()));
        assert_eq!(store.stats().version, "2");
    }

    #[test]
    fn test_store_capacity_eviction() {
        let mut store = store(2);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);
        store.set("c", "3".to_string(), None);

        assert!(!store.has("a"));
        assert!(store.has("b"));
        assert!(store.has("c"));
        assert_eq!(store.stats().counters.evictions, 1);
    }

    #[test]
    fn test_reads_do_not_refresh_eviction_priority() {
        let mut store = store(3);

        store.set("key1", "value1".to_string(), None);
        store.set("key2", "value2".to_string(), None);
        store.set("key3", "value3".to_string(), None);

        // Reading key1 does not protect it
        assert!(store.has("key1"));
        store.set("key4", "value4".to_string(), None);

        assert!(!store.has("key1"));
        assert!(store.has("key2"));
    }

    #[test]
    fn test_overwrite_refreshes_write_order() {
        let mut store = store(3);

        store.set("key1", "value1".to_string(), None);
        store.set("key2", "value2".to_string(), None);
        store.set("key3", "value3".to_string(), None);

        // key1 is the oldest, so the capacity check evicts it before the
        // overwrite re-inserts it as the newest entry
        store.set("key1", "value1b".to_string(), None);
        assert_eq!(store.len(), 3);

        store.set("key4", "value4".to_string(), None);
        assert!(!store.has("key2"));
        store.set("key5", "value5".to_string(), None);
        assert!(!store.has("key3"));

        assert_eq!(store.get("key1"), Some("value1b".to_string()));
    }

    #[test]
    fn test_overwrite_at_capacity_evicts_oldest_other_key() {
        let mut store = store(2);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);
        store.set("b", "2b".to_string(), None);

        assert_eq!(store.len(), 1);
        assert!(!store.has("a"));
        assert_eq!(store.get("b"), Some("2b".to_string()));
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);

        store.set("key1", "value1".to_string(), None);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.counters.hits, 1);
        assert_eq!(stats.counters.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 100);
        assert_eq!(stats.version, "1");
        assert_eq!(stats.items[0].key, "key1");
    }

    #[test]
    fn test_stats_saturate_huge_ttl() {
        let mut store = store(100);

        store.set("pinned", "forever".to_string(), Some(Duration::MAX));

        let stats = store.stats();
        assert_eq!(stats.items[0].ttl_ms, u64::MAX);
        assert!(store.has("pinned"));
    }

    #[test]
    fn test_delete_matching_is_literal_substring() {
        let mut store = store(100);

        store.set("user:42:lists", "l".to_string(), None);
        store.set("user:42:items", "i".to_string(), None);
        store.set("user:7:lists", "l".to_string(), None);
        store.set("user.42", "dot".to_string(), None);

        assert_eq!(store.delete_matching("user:42"), 2);
        assert!(store.has("user:7:lists"));
        assert!(store.has("user.42"));

        // Regex metacharacters are not interpreted
        assert_eq!(store.delete_matching("user.*"), 0);
    }
}
