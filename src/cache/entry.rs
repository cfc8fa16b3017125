//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and schema
//! version stamps.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single cache entry with value and metadata.
///
/// Entries are immutable once written; a new `set` replaces them wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// When the entry was written
    pub written_at: Instant,
    /// How long the entry stays valid after `written_at`
    pub ttl: Duration,
    /// Schema stamp of the store at write time
    pub schema_version: String,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry written now.
    pub fn new(data: T, ttl: Duration, schema_version: impl Into<String>) -> Self {
        Self {
            data,
            written_at: Instant::now(),
            ttl,
            schema_version: schema_version.into(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.written_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its TTL.
    ///
    /// An entry whose age equals its TTL is still valid; it expires once the
    /// age strictly exceeds the TTL.
    pub fn is_expired(&self) -> bool {
        self.age() > self.ttl
    }

    // == Is Valid ==
    /// An entry is valid iff it carries the store's current schema stamp and
    /// has not expired.
    pub fn is_valid(&self, current_version: &str) -> bool {
        self.schema_version == current_version && !self.is_expired()
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.age())
    }
}
