//! Media Cache - client-side caching core for a media catalog tracker
//!
//! TTL/version-aware store, coalescing fetch coordinator, asset preloader
//! and cross-store pattern invalidation.

pub mod api;
pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod invalidation;
pub mod models;
pub mod upstream;

pub use api::AppState;
pub use assets::{AssetLoader, AssetPreloader, HttpAssetLoader};
pub use cache::{CacheStats, CacheStore};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
pub use fetch::{FetchCoordinator, FetchOptions};
pub use invalidation::{InvalidationIndex, PatternInvalidate};
