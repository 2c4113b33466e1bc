//! Object storage capability
//!
//! Campaign inputs (recipient table, suppression list, message template) live
//! in bulk object storage. The engine only needs "fetch a key as text", so
//! the capability is a small trait with an HTTP adapter for stores that
//! expose objects over GET (S3 presigned/static hosting, MinIO, plain HTTP).

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Timeout for a single object fetch
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Read access to bulk object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object at `key` as UTF-8 text
    async fn fetch(&self, key: &str) -> Result<String>;
}

/// [`ObjectStore`] adapter for stores that serve objects over HTTP GET
///
/// Keys are resolved relative to a base URL, so `recipients.csv` against
/// `https://bucket.example.com/campaign/` fetches
/// `https://bucket.example.com/campaign/recipients.csv`.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpObjectStore {
    /// Create a new HTTP object store rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = url::Url::parse(base_url).map_err(|e| {
            Error::Storage(format!("invalid object store base URL '{base_url}': {e}"))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Storage(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch(&self, key: &str) -> Result<String> {
        let url = self
            .base_url
            .join(key)
            .map_err(|e| Error::Storage(format!("invalid object key '{key}': {e}")))?;

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Storage(format!(
                    "timeout fetching '{key}' (exceeded {FETCH_TIMEOUT_SECS} seconds)"
                ))
            } else {
                Error::Storage(format!("failed to fetch '{key}': {e}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "HTTP error fetching '{key}': {} {url}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Storage(format!("failed to read body of '{key}': {e}")))
    }
}
