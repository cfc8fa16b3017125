//! Fetch Module
//!
//! Cache-or-fetch coordination with in-flight coalescing and optimistic writes.

mod coordinator;

pub use coordinator::{FetchCoordinator, FetchOptions};
