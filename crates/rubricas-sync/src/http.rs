//! HTTP source for the published rubrica data files.

use std::time::Duration;

use async_trait::async_trait;
use rubricas_core::{CatalogError, CollectionSource, DetailSource, validate_code};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Server { url: String, status: u16 },
}

impl From<SyncError> for CatalogError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Server { ref url, status: 404 | 410 } => CatalogError::NotFound(url.clone()),
            SyncError::Server { .. } => CatalogError::Transport(err.to_string()),
            SyncError::Http(ref inner) if inner.is_decode() => {
                CatalogError::MalformedData(err.to_string())
            }
            SyncError::Http(_) => CatalogError::Transport(err.to_string()),
        }
    }
}

/// Fetches `data/listagem-rubricas.json` and `data/rubricas/<codigo>.json`
/// relative to a base URL.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source for the site at `base_url`.
    ///
    /// `base_url` should be like `https://example.github.io/rubricas`; a
    /// trailing slash is dropped.
    pub fn new(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Like [`new`](Self::new), with a per-request timeout.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn listing_url(&self) -> String {
        format!("{}/data/listagem-rubricas.json", self.base_url)
    }

    pub fn record_url(&self, codigo: &str) -> String {
        format!("{}/data/rubricas/{codigo}.json", self.base_url)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        info!(url = %url, "fetching");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "request not successful");
            return Err(SyncError::Server {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[async_trait]
impl CollectionSource for HttpSource {
    async fn fetch_collection(&self) -> Result<Vec<u8>, CatalogError> {
        Ok(self.get(&self.listing_url()).await?)
    }
}

#[async_trait]
impl DetailSource for HttpSource {
    async fn fetch_record(&self, codigo: &str) -> Result<Vec<u8>, CatalogError> {
        validate_code(codigo)?;
        Ok(self.get(&self.record_url(codigo)).await?)
    }
}
