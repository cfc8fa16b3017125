//! Fetch Coordinator
//!
//! Wraps a `CacheStore` and guarantees at most one running producer per key.
//! Callers arriving while a fetch is running join it and receive the same
//! settled outcome.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

type PendingFetch<T> = Shared<BoxFuture<'static, Result<T>>>;

// == Fetch Options ==
/// Per-call options for `get_data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// TTL for the fetched entry; the store default when `None`
    pub ttl: Option<Duration>,
    /// Skip the cache-hit check (an already running fetch is still joined)
    pub force_refresh: bool,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// Guarded by a std `Mutex`: every critical section is synchronous and never
/// spans an await.
struct Inner<T> {
    store: CacheStore<T>,
    in_flight: HashMap<String, PendingFetch<T>>,
}

// == Fetch Coordinator ==
/// Cache-or-coalesced-fetch front for one store.
///
/// Cloning is cheap and every clone shares the same store and in-flight map.
/// The internal lock is never held across an await, so every synchronous
/// step (hit check, join, registration, write-back) is atomic.
pub struct FetchCoordinator<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for FetchCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FetchCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(config: CacheConfig) -> Self {
        Self::with_store(CacheStore::new(config))
    }

    pub fn with_store(store: CacheStore<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                store,
                in_flight: HashMap::new(),
            })),
        }
    }

    // == Get Data ==
    /// Returns the cached value for `key`, or the result of `fetcher`.
    ///
    /// 1. Unless `force_refresh`, a valid cached value is returned and
    ///    `fetcher` is never called.
    /// 2. If a fetch for `key` is already running, the caller joins it.
    /// 3. Otherwise `fetcher` is called once, on its own task and outside
    ///    the lock, so it may read this coordinator. Success is written to
    ///    the store; failure writes nothing. Either way the in-flight slot
    ///    is released before waiters wake.
    pub async fn get_data<F, Fut>(&self, key: &str, fetcher: F, options: FetchOptions) -> Result<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let pending = {
            let mut inner = self.lock();

            if !options.force_refresh {
                if let Some(data) = inner.store.get(key) {
                    debug!(key, "cache hit");
                    return Ok(data);
                }
            }

            match inner.in_flight.get(key) {
                Some(pending) => {
                    debug!(key, "joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    debug!(key, force_refresh = options.force_refresh, "starting fetch");
                    self.start_fetch(&mut inner, key, fetcher, options.ttl)
                }
            }
        };

        pending.await
    }

    fn start_fetch<F, Fut>(
        &self,
        inner: &mut Inner<T>,
        key: &str,
        fetcher: F,
        ttl: Option<Duration>,
    ) -> PendingFetch<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let coordinator = self.clone();
        let task_key = key.to_string();

        // Settlement takes the lock, so it cannot run before the slot below
        // is registered. The producer is called inside the unwind guard so a
        // panic before it returns a future is caught as well.
        let handle = tokio::spawn(async move {
            let fetch = async move { fetcher().await };
            let outcome = match AssertUnwindSafe(fetch).catch_unwind().await {
                Ok(Ok(data)) => Ok(data),
                Ok(Err(err)) => Err(CacheError::fetch_failed(&task_key, err)),
                Err(_) => Err(CacheError::Internal(format!(
                    "fetcher for '{}' panicked",
                    task_key
                ))),
            };
            coordinator.settle(&task_key, &outcome, ttl);
            outcome
        });

        let join_key = key.to_string();
        let pending = async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(CacheError::Internal(format!(
                    "fetch task for '{}' did not complete: {}",
                    join_key, err
                ))),
            }
        }
        .boxed()
        .shared();

        inner.in_flight.insert(key.to_string(), pending.clone());
        pending
    }

    fn settle(&self, key: &str, outcome: &Result<T>, ttl: Option<Duration>) {
        let mut inner = self.lock();
        match outcome {
            Ok(data) => inner.store.set(key, data.clone(), ttl),
            Err(err) => warn!(key, error = %err, "fetch failed, cache left untouched"),
        }
        inner.in_flight.remove(key);
    }

    // == Optimistic Write ==
    /// Writes `data` as if a fetch had just returned it.
    ///
    /// Visible to the next hit check; replaced by the next successful fetch
    /// or dropped when its TTL lapses. A failing fetch does not roll it back.
    pub fn set_optimistic(&self, key: impl Into<String>, data: T, ttl: Option<Duration>) {
        let key = key.into();
        debug!(key = %key, "optimistic write");
        self.lock().store.set(key, data, ttl);
    }

    // == Store Pass-Through ==
    /// Cache-only read; never fetches.
    pub fn peek(&self, key: &str) -> Option<T> {
        self.lock().store.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.lock().store.has(key)
    }

    /// Removes one cached entry. A running fetch for `key` is not affected.
    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().store.delete(key)
    }

    /// Removes every cached entry whose key contains `pattern`.
    pub fn delete_matching(&self, pattern: &str) -> usize {
        self.lock().store.delete_matching(pattern)
    }

    pub fn clear(&self) {
        self.lock().store.clear();
    }

    pub fn set_schema_version(&self, version: impl Into<String>) {
        self.lock().store.set_schema_version(version);
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().store.stats()
    }

    /// Number of fetches currently running.
    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
