//! API Handlers
//!
//! HTTP request handlers for each diagnostics endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::assets::{AssetLoader, AssetPreloader, HttpAssetLoader};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{FetchCoordinator, FetchOptions};
use crate::invalidation::InvalidationIndex;
use crate::models::{
    AssetStats, FetchQuery, FetchResponse, HealthResponse, InvalidateResponse, OptimisticRequest,
    OptimisticResponse, PreloadRequest, PreloadResponse, StatsResponse, StoreStats,
};
use crate::upstream::UpstreamClient;

/// Name of the long-lived catalog metadata store
pub const CATALOG_STORE: &str = "catalog";
/// Name of the short-lived per-user store
pub const USER_STORE: &str = "user";

/// Application state shared across all handlers.
///
/// Built once at start-up and handed to the router; every field is a cheap
/// handle onto shared state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: FetchCoordinator<Value>,
    pub user: FetchCoordinator<Value>,
    pub assets: AssetPreloader,
    pub invalidation: InvalidationIndex,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Wires the two stores into one invalidation index.
    pub fn new(
        catalog: FetchCoordinator<Value>,
        user: FetchCoordinator<Value>,
        assets: AssetPreloader,
        upstream: UpstreamClient,
    ) -> Self {
        let invalidation = InvalidationIndex::new()
            .with_store(CATALOG_STORE, Arc::new(catalog.clone()))
            .with_store(USER_STORE, Arc::new(user.clone()));

        Self {
            catalog,
            user,
            assets,
            invalidation,
            upstream,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.asset_timeout);
        let loader: Arc<dyn AssetLoader> = Arc::new(HttpAssetLoader::new(timeout)?);

        Ok(Self::new(
            FetchCoordinator::new(config.catalog_cache()),
            FetchCoordinator::new(config.user_cache()),
            AssetPreloader::new(loader),
            UpstreamClient::new(config.upstream_url.clone(), timeout)?,
        ))
    }

    /// Looks up a store by name.
    pub fn store(&self, name: &str) -> Result<&FetchCoordinator<Value>> {
        match name {
            CATALOG_STORE => Ok(&self.catalog),
            USER_STORE => Ok(&self.user),
            other => Err(CacheError::NotFound(format!("store '{}'", other))),
        }
    }
}

/// Handler for GET /fetch/:store/*key
///
/// Returns the cached value, or fetches `{upstream}/{key}` once no matter how
/// many requests for the key arrive concurrently.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path((store_name, key)): Path<(String, String)>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<FetchResponse>> {
    let store = state.store(&store_name)?;

    let mut options = FetchOptions::new();
    if query.refresh {
        options = options.force_refresh();
    }
    if let Some(ttl) = query.ttl {
        options = options.with_ttl(Duration::from_secs(ttl));
    }

    let upstream = state.upstream.clone();
    let fetch_key = key.clone();
    let value = store
        .get_data(
            &key,
            move || async move { upstream.fetch_json(&fetch_key).await },
            options,
        )
        .await?;

    Ok(Json(FetchResponse::new(store_name, key, value)))
}

/// Handler for PUT /optimistic
pub async fn optimistic_handler(
    State(state): State<AppState>,
    Json(req): Json<OptimisticRequest>,
) -> Result<Json<OptimisticResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let store = state.store(&req.store)?;
    store.set_optimistic(req.key.clone(), req.value, req.ttl.map(Duration::from_secs));

    Ok(Json(OptimisticResponse::new(req.store, req.key)))
}

/// Handler for DELETE /invalidate/:pattern
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.invalidation.invalidate_pattern(&pattern);
    info!(pattern = %pattern, removed, "invalidation requested");
    Json(InvalidateResponse::new(pattern, removed))
}

/// Handler for POST /preload
pub async fn preload_handler(
    State(state): State<AppState>,
    Json(req): Json<PreloadRequest>,
) -> Result<Json<PreloadResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let url = state.assets.preload(&req.url).await?;
    Ok(Json(PreloadResponse { url }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut stores = BTreeMap::new();
    for (name, store) in [(CATALOG_STORE, &state.catalog), (USER_STORE, &state.user)] {
        stores.insert(
            name.to_string(),
            StoreStats::new(store.stats(), store.in_flight_count()),
        );
    }

    Json(StatsResponse {
        stores,
        assets: AssetStats {
            loaded: state.assets.loaded_count(),
            loading: state.assets.loading_count(),
        },
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
