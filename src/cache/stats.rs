//! Cache Statistics Module
//!
//! Snapshot of a store's contents and cumulative hit/miss/eviction counters.

use serde::Serialize;

// == Entry Stats ==
/// Age and TTL of one live entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStats {
    pub key: String,
    /// Milliseconds since the entry was written
    pub age_ms: u64,
    /// Entry TTL in milliseconds
    pub ttl_ms: u64,
}

// == Counters ==
/// Cumulative counters kept by a store across its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounters {
    /// Reads that found a valid entry
    pub hits: u64,
    /// Reads that found nothing, or a stale entry
    pub misses: u64,
    /// Entries removed to stay within capacity
    pub evictions: u64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Cache Stats ==
/// Diagnostic snapshot returned by `CacheStore::stats`.
///
/// `items` lists every entry currently held, including stale ones that have
/// not been read since they lapsed.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Current schema stamp
    pub version: String,
    pub items: Vec<EntryStats>,
    #[serde(flatten)]
    pub counters: CacheCounters,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.counters.hits + self.counters.misses;
        if total == 0 {
            0.0
        } else {
            self.counters.hits as f64 / total as f64
        }
    }

    /// Whether `key` is currently held (valid or not yet lazily expired).
    pub fn contains_key(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(counters: CacheCounters) -> CacheStats {
        CacheStats {
            size: 0,
            max_size: 10,
            version: "1".to_string(),
            items: Vec::new(),
            counters,
        }
    }

    #[test]
    fn test_counters_new() {
        let counters = CacheCounters::new();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(stats_with(CacheCounters::new()).hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = CacheCounters::new();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(stats_with(counters).hit_rate(), 0.75);
    }

    #[test]
    fn test_record_eviction() {
        let mut counters = CacheCounters::new();
        counters.record_eviction();
        counters.record_eviction();
        assert_eq!(counters.evictions, 2);
    }

    #[test]
    fn test_serializes_flat() {
        let mut stats = stats_with(CacheCounters::new());
        stats.items.push(EntryStats {
            key: "api-search:anime:frieren".to_string(),
            age_ms: 10,
            ttl_ms: 1000,
        });
        stats.size = 1;

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["size"], 1);
        assert_eq!(json["max_size"], 10);
        assert_eq!(json["hits"], 0);
        assert_eq!(json["items"][0]["key"], "api-search:anime:frieren");
        assert!(stats.contains_key("api-search:anime:frieren"));
    }
}
