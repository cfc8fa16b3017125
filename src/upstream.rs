//! Upstream JSON source used by the diagnostics fetch endpoint.

use std::time::Duration;

use anyhow::Context;
use tracing::debug;

/// Thin reqwest wrapper that reads `{base_url}/{key}` as JSON.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL a cache key maps to upstream.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }

    /// GETs the JSON document for `key`. Non-2xx statuses are errors.
    pub async fn fetch_json(&self, key: &str) -> anyhow::Result<serde_json::Value> {
        let url = self.url_for(key);
        debug!(url = %url, "fetching upstream");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?;
        let value = response
            .json()
            .await
            .with_context(|| format!("invalid JSON from {}", url))?;
        Ok(value)
    }
}
