//! Asset loaders.
//!
//! The preloader only decides *whether* to load a URL; an `AssetLoader`
//! performs the actual I/O.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Loads a single external asset (poster, avatar, backdrop...).
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Completes once the asset is fully available, or fails.
    async fn load(&self, url: &str) -> anyhow::Result<()>;
}

// == HTTP Loader ==
/// Fetches assets over HTTP and reads the body to completion.
#[derive(Debug, Clone)]
pub struct HttpAssetLoader {
    client: reqwest::Client,
}

impl HttpAssetLoader {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetLoader for HttpAssetLoader {
    async fn load(&self, url: &str) -> anyhow::Result<()> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!(url, bytes = body.len(), "asset loaded");
        Ok(())
    }
}
