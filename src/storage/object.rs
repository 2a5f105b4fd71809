//! Object-store collaborator.

use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// Remote object storage (S3-compatible).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `data` under `bucket/key` and returns its public URL.
    async fn upload(&self, data: Bytes, bucket: &str, key: &str) -> Result<String>;
}

/// HTTP PUT-based store for S3-style endpoints.
pub struct HttpObjectStore {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, data: Bytes, bucket: &str, key: &str) -> Result<String> {
        let url = format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            bucket,
            key
        );
        let response = self
            .http_client
            .put(&url)
            .header("Content-Type", "image/png")
            .body(data)
            .send()
            .await
            .map_err(|e| Error::storage(format!("object store upload failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::storage(format!(
                "object store upload rejected ({})",
                status
            )));
        }
        Ok(url)
    }
}
