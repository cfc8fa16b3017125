//! Error types for the caching core
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the caching core.
///
/// Cloneable so a single settled fetch or load can hand the same failure to
/// every caller that joined it.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Named store or key is unknown
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The producer for a key failed; shared by every waiter on that key
    #[error("Fetch failed for '{key}': {cause}")]
    FetchFailed {
        key: String,
        cause: Arc<anyhow::Error>,
    },

    /// An asset could not be loaded
    #[error("Asset load failed for '{url}': {cause}")]
    AssetLoadFailed {
        url: String,
        cause: Arc<anyhow::Error>,
    },

    /// Internal error (e.g. a fetch task panicked)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    pub fn fetch_failed(key: impl Into<String>, cause: anyhow::Error) -> Self {
        CacheError::FetchFailed {
            key: key.into(),
            cause: Arc::new(cause),
        }
    }

    pub fn asset_load_failed(url: impl Into<String>, cause: anyhow::Error) -> Self {
        CacheError::AssetLoadFailed {
            url: url.into(),
            cause: Arc::new(cause),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::FetchFailed { .. } | CacheError::AssetLoadFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching core.
pub type Result<T> = std::result::Result<T, CacheError>;
