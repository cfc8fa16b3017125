//! Asset Preloader
//!
//! De-duplicates loads of external assets. A URL that loaded once stays
//! loaded for the life of the process; there is no TTL.
//!
//! Callers that arrive while a URL is loading share one pending handle with
//! the initiator and receive the same success or failure.

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::assets::AssetLoader;
use crate::error::{CacheError, Result};

type PendingLoad = Shared<BoxFuture<'static, Result<String>>>;

struct InFlightLoad {
    /// Distinguishes loads of the same URL started before and after `clear`
    id: u64,
    pending: PendingLoad,
}

/// Guarded by a std `Mutex`: every critical section is synchronous and never
/// spans an await.
#[derive(Default)]
struct Inner {
    loaded: HashSet<String>,
    loading: HashMap<String, InFlightLoad>,
    next_id: u64,
}

// == Asset Preloader ==
#[derive(Clone)]
pub struct AssetPreloader {
    loader: Arc<dyn AssetLoader>,
    inner: Arc<Mutex<Inner>>,
}

impl AssetPreloader {
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    // == Preload ==
    /// Ensures `url` is loaded and returns it.
    ///
    /// Loaded URLs return immediately; a URL already loading is joined;
    /// anything else starts a load on its own task.
    pub async fn preload(&self, url: &str) -> Result<String> {
        let pending = {
            let mut inner = self.lock();

            if inner.loaded.contains(url) {
                return Ok(url.to_string());
            }

            match inner.loading.get(url) {
                Some(load) => {
                    debug!(url, "joining in-flight asset load");
                    load.pending.clone()
                }
                None => self.start_load(&mut inner, url),
            }
        };

        pending.await
    }

    fn start_load(&self, inner: &mut Inner, url: &str) -> PendingLoad {
        let id = inner.next_id;
        inner.next_id += 1;

        let loader = Arc::clone(&self.loader);
        let preloader = self.clone();
        let task_url = url.to_string();

        let handle = tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(loader.load(&task_url)).catch_unwind().await {
                Ok(Ok(())) => Ok(task_url.clone()),
                Ok(Err(err)) => Err(CacheError::asset_load_failed(&task_url, err)),
                Err(_) => Err(CacheError::Internal(format!(
                    "asset loader for '{}' panicked",
                    task_url
                ))),
            };
            preloader.settle(&task_url, id, &outcome);
            outcome
        });

        let join_url = url.to_string();
        let pending = async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(CacheError::Internal(format!(
                    "asset load for '{}' did not complete: {}",
                    join_url, err
                ))),
            }
        }
        .boxed()
        .shared();

        debug!(url, id, "starting asset load");
        inner.loading.insert(
            url.to_string(),
            InFlightLoad {
                id,
                pending: pending.clone(),
            },
        );
        pending
    }

    fn settle(&self, url: &str, id: u64, outcome: &Result<String>) {
        let mut inner = self.lock();
        match outcome {
            Ok(_) => {
                inner.loaded.insert(url.to_string());
            }
            Err(err) => warn!(url, error = %err, "asset load failed"),
        }
        // A load started after `clear` owns the mark now
        if inner.loading.get(url).map(|load| load.id) == Some(id) {
            inner.loading.remove(url);
        }
    }

    // == Clear ==
    /// Forgets every loaded and loading URL. Running loads are not cancelled.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.loaded.clear();
        inner.loading.clear();
    }

    pub fn is_loaded(&self, url: &str) -> bool {
        self.lock().loaded.contains(url)
    }

    pub fn is_loading(&self, url: &str) -> bool {
        self.lock().loading.contains_key(url)
    }

    pub fn loaded_count(&self) -> usize {
        self.lock().loaded.len()
    }

    pub fn loading_count(&self) -> usize {
        self.lock().loading.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
