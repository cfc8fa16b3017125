//! Write-Order Tracker Module
//!
//! Tracks the order in which keys were last written, for capacity eviction.
//!
//! Only writes move a key; reads never refresh its eviction priority. The
//! back of the queue therefore always holds the entry with the smallest
//! `written_at`, which is exactly the entry the store evicts.

use std::collections::VecDeque;

// == Write-Order Tracker ==
/// Keys ordered by last write time.
///
/// - Front = most recently written
/// - Back = least recently written
#[derive(Debug, Default)]
pub struct WriteOrderTracker {
    order: VecDeque<String>,
}

impl WriteOrderTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Write ==
    /// Marks a key as just written (moves it to the front).
    pub fn record_write(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently written key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.back()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
