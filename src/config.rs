//! Configuration Module
//!
//! Per-store cache configuration and the service configuration loaded from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default schema stamp written into every entry.
pub const DEFAULT_SCHEMA_VERSION: &str = "1";

// == Cache Config ==
/// Configuration of a single cache store, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries before write-order eviction kicks in
    pub max_entries: usize,
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Schema stamp; entries written under another stamp read as absent
    pub schema_version: String,
}

impl CacheConfig {
    pub fn new(max_entries: usize, default_ttl: Duration, schema_version: impl Into<String>) -> Self {
        Self {
            max_entries,
            default_ttl,
            schema_version: schema_version.into(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            default_ttl: Duration::from_secs(300),
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
        }
    }
}

// == Service Config ==
/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Capacity of the catalog metadata store
    pub catalog_max_entries: usize,
    /// Default TTL in seconds for catalog metadata (stable, long-lived)
    pub catalog_ttl: u64,
    /// Capacity of the per-user store
    pub user_max_entries: usize,
    /// Default TTL in seconds for per-user data (volatile, short-lived)
    pub user_ttl: u64,
    /// Schema stamp shared by both stores
    pub schema_version: String,
    /// Base URL the diagnostics fetch endpoint reads from on a miss
    pub upstream_url: String,
    /// Timeout in seconds for a single asset request
    pub asset_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CATALOG_MAX_ENTRIES` - Catalog store capacity (default: 100)
    /// - `CATALOG_TTL` - Catalog TTL in seconds (default: 1800)
    /// - `USER_MAX_ENTRIES` - User store capacity (default: 50)
    /// - `USER_TTL` - User TTL in seconds (default: 120)
    /// - `SCHEMA_VERSION` - Entry schema stamp (default: "1")
    /// - `UPSTREAM_URL` - Upstream base URL (default: http://localhost:8080)
    /// - `ASSET_TIMEOUT` - Asset request timeout in seconds (default: 15)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            catalog_max_entries: env_or("CATALOG_MAX_ENTRIES", defaults.catalog_max_entries),
            catalog_ttl: env_or("CATALOG_TTL", defaults.catalog_ttl),
            user_max_entries: env_or("USER_MAX_ENTRIES", defaults.user_max_entries),
            user_ttl: env_or("USER_TTL", defaults.user_ttl),
            schema_version: env::var("SCHEMA_VERSION").unwrap_or(defaults.schema_version),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            asset_timeout: env_or("ASSET_TIMEOUT", defaults.asset_timeout),
        }
    }

    /// Store configuration for catalog metadata.
    pub fn catalog_cache(&self) -> CacheConfig {
        CacheConfig::new(
            self.catalog_max_entries,
            Duration::from_secs(self.catalog_ttl),
            self.schema_version.clone(),
        )
    }

    /// Store configuration for per-user data.
    pub fn user_cache(&self) -> CacheConfig {
        CacheConfig::new(
            self.user_max_entries,
            Duration::from_secs(self.user_ttl),
            self.schema_version.clone(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            catalog_max_entries: 100,
            catalog_ttl: 1800,
            user_max_entries: 50,
            user_ttl: 120,
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            upstream_url: "http://localhost:8080".to_string(),
            asset_timeout: 15,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.catalog_max_entries, 100);
        assert_eq!(config.catalog_ttl, 1800);
        assert_eq!(config.user_max_entries, 50);
        assert_eq!(config.user_ttl, 120);
        assert_eq!(config.schema_version, "1");
    }

    #[test]
    fn test_store_configs_follow_service_config() {
        let config = Config {
            catalog_ttl: 60,
            user_ttl: 5,
            schema_version: "v3".to_string(),
            ..Config::default()
        };

        let catalog = config.catalog_cache();
        assert_eq!(catalog.default_ttl, Duration::from_secs(60));
        assert_eq!(catalog.max_entries, 100);
        assert_eq!(catalog.schema_version, "v3");

        let user = config.user_cache();
        assert_eq!(user.default_ttl, Duration::from_secs(5));
        assert_eq!(user.max_entries, 50);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("MEDIA_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("MEDIA_CACHE_TEST_GARBAGE", 7u64), 7);
        env::remove_var("MEDIA_CACHE_TEST_GARBAGE");
        assert_eq!(env_or("MEDIA_CACHE_TEST_UNSET", 9usize), 9);
    }
}
