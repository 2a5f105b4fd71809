//! Cache index: the metadata document mirrored next to the cached artifacts.

use super::key::ContentKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

pub(crate) const INDEX_FILENAME: &str = "cache_index.json";

/// Metadata for one cached artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Filename relative to the cache root.
    pub filename: String,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    pub(crate) fn new(filename: String, kind: ContentKind) -> Self {
        let now = Utc::now();
        Self {
            filename,
            kind,
            created_at: now,
            last_accessed: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }
}

pub(crate) type IndexMap = HashMap<String, CacheEntry>;

/// Load the index document, treating any unreadable state as a cold start.
/// A corrupt index is a warning, never an error surfaced to callers.
pub(crate) fn load_index(path: &Path) -> IndexMap {
    if !path.exists() {
        return IndexMap::new();
    }
    match std::fs::read(path) {
        Ok(data) => match serde_json::from_slice(&data) {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "cache index unreadable, starting cold");
                IndexMap::new()
            }
        },
        Err(e) => {
            warn!(error = %e, path = %path.display(), "cache index unreadable, starting cold");
            IndexMap::new()
        }
    }
}

/// Flush the index document. Synchronous write, no WAL: the accepted loss
/// window is "since last flush".
pub(crate) fn save_index(path: &Path, index: &IndexMap) -> crate::Result<()> {
    let data = serde_json::to_vec_pretty(index)?;
    std::fs::write(path, data)?;
    Ok(())
}
