//! Invalidation Index
//!
//! Purges entries whose key contains a literal substring, across every
//! registered store. Called from write paths (e.g. after a list edit) so that
//! cached reads of the affected scope are refetched.

use std::sync::Arc;

use tracing::{debug, info};

use crate::fetch::FetchCoordinator;

/// A store that can drop entries by key substring.
pub trait PatternInvalidate: Send + Sync {
    /// Deletes every entry whose key contains `pattern`; returns the count.
    fn invalidate_matching(&self, pattern: &str) -> usize;
}

impl<T> PatternInvalidate for FetchCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn invalidate_matching(&self, pattern: &str) -> usize {
        self.delete_matching(pattern)
    }
}

// == Invalidation Index ==
/// Named set of stores that `invalidate_pattern` sweeps.
///
/// Stores with different value types can be registered side by side.
/// Asset preloader state is never touched.
#[derive(Clone, Default)]
pub struct InvalidationIndex {
    stores: Vec<(String, Arc<dyn PatternInvalidate>)>,
}

impl InvalidationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a store under `name` (used in logs and diagnostics).
    pub fn register(&mut self, name: impl Into<String>, store: Arc<dyn PatternInvalidate>) {
        self.stores.push((name.into(), store));
    }

    /// Builder form of `register`.
    pub fn with_store(mut self, name: impl Into<String>, store: Arc<dyn PatternInvalidate>) -> Self {
        self.register(name, store);
        self
    }

    // == Invalidate Pattern ==
    /// Removes every key containing `pattern` (literal, not a regex) from
    /// every registered store. Returns the total number of removed entries.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let mut total = 0;
        for (name, store) in &self.stores {
            let removed = store.invalidate_matching(pattern);
            if removed > 0 {
                debug!(store = %name, pattern, removed, "invalidated entries");
            }
            total += removed;
        }
        info!(pattern, removed = total, "pattern invalidation complete");
        total
    }

    pub fn store_names(&self) -> Vec<&str> {
        self.stores.iter().map(|(name, _)| name.as_str()).collect()
    }
}
