//! Artifact persistence with object-store fallback.

use super::object::ObjectStore;
use crate::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Which rendition of an illustration is being saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    Color,
    Bw,
}

impl ImageVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Bw => "bw",
        }
    }
}

/// Where a saved artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Local path or remote URL.
    pub location: String,
    pub remote: bool,
}

/// Persists generated images under stable per-user names, choosing between
/// an object-store backend and the local filesystem.
pub struct ArtifactStore {
    local_dir: PathBuf,
    use_object_store: bool,
    bucket: String,
    object_store: Option<Arc<dyn ObjectStore>>,
    http_client: reqwest::Client,
}

impl ArtifactStore {
    /// Local-filesystem-only store.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self {
            local_dir: dir.into(),
            use_object_store: false,
            bucket: String::new(),
            object_store: None,
            http_client: reqwest::Client::new(),
        }
    }

    /// Store that prefers the object-store backend, falling back to
    /// `local_dir` per artifact on upload failure.
    pub fn with_object_store(
        dir: impl Into<PathBuf>,
        bucket: impl Into<String>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            local_dir: dir.into(),
            use_object_store: true,
            bucket: bucket.into(),
            object_store: Some(store),
            http_client: reqwest::Client::new(),
        }
    }

    /// Persists `source` (a local path or an http(s) URL) under
    /// `{username}_{variant}_{n}.png`.
    ///
    /// An object-store upload failure is logged and falls back to local
    /// persistence for this artifact only; object-store mode stays enabled
    /// for subsequent calls.
    pub async fn save(
        &self,
        username: &str,
        variant: ImageVariant,
        source: &str,
    ) -> Result<SavedArtifact> {
        std::fs::create_dir_all(&self.local_dir)?;
        let sequence = next_sequence(&self.local_dir, username, variant)?;
        let filename = format!("{}_{}_{}.png", username, variant.as_str(), sequence);

        let bytes = self.read_source(source).await?;

        if self.use_object_store {
            if let Some(store) = &self.object_store {
                match store.upload(bytes.clone(), &self.bucket, &filename).await {
                    Ok(url) => {
                        info!(url = %url, "artifact uploaded to object store");
                        return Ok(SavedArtifact {
                            location: url,
                            remote: true,
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "object store upload failed, falling back to local storage")
                    }
                }
            }
        }

        let path = self.local_dir.join(&filename);
        std::fs::write(&path, &bytes)?;
        Ok(SavedArtifact {
            location: path.to_string_lossy().into_owned(),
            remote: false,
        })
    }

    async fn read_source(&self, source: &str) -> Result<Bytes> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let response = self
                .http_client
                .get(source)
                .send()
                .await
                .map_err(|e| Error::storage(format!("failed to fetch remote artifact: {}", e)))?;
            response
                .bytes()
                .await
                .map_err(|e| Error::storage(format!("failed to read remote artifact: {}", e)))
        } else {
            Ok(Bytes::from(std::fs::read(source)?))
        }
    }
}

// Next per-user, per-variant sequence number, derived by listing the
// destination directory. Concurrent saves for the same user and variant can
// race; accepted limitation at this scope.
fn next_sequence(dir: &Path, username: &str, variant: ImageVariant) -> Result<usize> {
    let prefix = format!("{}_{}_", username, variant.as_str());
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(&prefix) {
            count += 1;
        }
    }
    Ok(count + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct RejectingStore;

    #[async_trait]
    impl ObjectStore for RejectingStore {
        async fn upload(&self, _data: Bytes, _bucket: &str, _key: &str) -> Result<String> {
            Err(Error::storage("bucket unavailable"))
        }
    }

    #[tokio::test]
    async fn local_save_numbers_per_user_and_variant() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("img.png");
        std::fs::write(&source, b"png bytes").unwrap();
        let store = ArtifactStore::local(dir.path().join("static"));

        let first = store
            .save("luna", ImageVariant::Color, &source.to_string_lossy())
            .await
            .unwrap();
        let second = store
            .save("luna", ImageVariant::Color, &source.to_string_lossy())
            .await
            .unwrap();
        let other = store
            .save("luna", ImageVariant::Bw, &source.to_string_lossy())
            .await
            .unwrap();

        assert!(first.location.ends_with("luna_color_1.png"));
        assert!(second.location.ends_with("luna_color_2.png"));
        assert!(other.location.ends_with("luna_bw_1.png"));
        assert!(!first.remote);
    }

    #[tokio::test]
    async fn upload_failure_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("img.png");
        std::fs::write(&source, b"png bytes").unwrap();
        let store = ArtifactStore::with_object_store(
            dir.path().join("static"),
            "bucket",
            Arc::new(RejectingStore),
        );

        let saved = store
            .save("luna", ImageVariant::Color, &source.to_string_lossy())
            .await
            .unwrap();
        assert!(!saved.remote);
        assert!(Path::new(&saved.location).exists());
    }
}
