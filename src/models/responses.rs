//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /fetch/:store/*key
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    pub store: String,
    pub key: String,
    pub value: serde_json::Value,
}

impl FetchResponse {
    pub fn new(store: impl Into<String>, key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            store: store.into(),
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /optimistic
#[derive(Debug, Clone, Serialize)]
pub struct OptimisticResponse {
    /// Success message
    pub message: String,
    pub store: String,
    pub key: String,
}

impl OptimisticResponse {
    pub fn new(store: impl Into<String>, key: impl Into<String>) -> Self {
        let store = store.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' written optimistically to '{}'", key, store),
            store,
            key,
        }
    }
}

/// Response body for DELETE /invalidate/:pattern
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub pattern: String,
    /// Entries removed across all stores
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(pattern: impl Into<String>, removed: usize) -> Self {
        Self {
            pattern: pattern.into(),
            removed,
        }
    }
}

/// Response body for POST /preload
#[derive(Debug, Clone, Serialize)]
pub struct PreloadResponse {
    /// The resolved asset URL
    pub url: String,
}

/// Preloader section of the stats response
#[derive(Debug, Clone, Serialize)]
pub struct AssetStats {
    pub loaded: usize,
    pub loading: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Per-store snapshots, keyed by store name
    pub stores: BTreeMap<String, StoreStats>,
    pub assets: AssetStats,
}

/// One store's snapshot plus derived figures
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    #[serde(flatten)]
    pub cache: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Fetches currently running
    pub in_flight: usize,
}

impl StoreStats {
    pub fn new(cache: CacheStats, in_flight: usize) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            in_flight,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheCounters;

    #[test]
    fn test_optimistic_response_serialize() {
        let resp = OptimisticResponse::new("user", "user-lists:42");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("user-lists:42"));
        assert!(json.contains("optimistically"));
    }

    #[test]
    fn test_store_stats_flattens_cache_stats() {
        let mut counters = CacheCounters::new();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        let cache = CacheStats {
            size: 1,
            max_size: 10,
            version: "1".to_string(),
            items: Vec::new(),
            counters,
        };

        let resp = StoreStats::new(cache, 2);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["size"], 1);
        assert_eq!(json["hits"], 3);
        assert_eq!(json["in_flight"], 2);
        assert!((resp.hit_rate - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
