//! Cache Module
//!
//! Provides the in-memory store with TTL expiration, schema version stamps
//! and write-order eviction.

mod entry;
pub mod keys;
mod stats;
mod store;
mod write_order;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::{CacheCounters, CacheStats, EntryStats};
pub use store::CacheStore;
pub use write_order::WriteOrderTracker;
