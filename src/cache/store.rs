//! File-backed content cache with strict LRU eviction.

use super::index::{load_index, save_index, CacheEntry, IndexMap, INDEX_FILENAME};
use super::key::{ContentKey, ContentKind};
use crate::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of a [`ContentCache::store`] call.
///
/// `cached` is false when the copy into the cache failed; `path` then still
/// points at the caller's original artifact. Caching is best-effort and must
/// never block the caller's primary result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOutcome {
    pub path: PathBuf,
    pub cached: bool,
}

/// Bounded, file-backed cache keyed by content digests.
///
/// All mutation (lookup access bumps, inserts, eviction, self-heal purges)
/// is serialized by one mutex over the in-memory index and its on-disk
/// mirror, so the index always reflects disk state. Construct one instance
/// per cache root and share it by handle; tests get an isolated root each.
pub struct ContentCache {
    root: PathBuf,
    index_path: PathBuf,
    max_entries: usize,
    index: Mutex<IndexMap>,
}

impl ContentCache {
    /// Opens (or creates) a cache rooted at `root`, keeping at most
    /// `max_entries` artifacts. An unreadable index document is treated as
    /// an empty cache.
    pub fn open(root: impl Into<PathBuf>, max_entries: usize) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let index_path = root.join(INDEX_FILENAME);
        let index = load_index(&index_path);
        Ok(Self {
            root,
            index_path,
            max_entries,
            index: Mutex::new(index),
        })
    }

    /// Returns the cached artifact path for `(content, kind)`, if present.
    ///
    /// A hit bumps the entry's access time and flushes the index. A stale
    /// entry whose backing file is gone is purged (self-healing) and
    /// reported as a miss. A miss is a normal outcome, not a failure.
    pub fn lookup(&self, content: &str, kind: ContentKind) -> Option<PathBuf> {
        let key = ContentKey::derive(content, kind);
        let mut index = self.index.lock().unwrap();
        let filename = match index.get(key.as_str()) {
            Some(entry) => entry.filename.clone(),
            None => return None,
        };
        let path = self.root.join(&filename);
        if path.exists() {
            if let Some(entry) = index.get_mut(key.as_str()) {
                entry.touch();
            }
            if let Err(e) = save_index(&self.index_path, &index) {
                warn!(error = %e, "failed to persist cache index after hit");
            }
            debug!(key = %key, "cache hit");
            Some(path)
        } else {
            index.remove(key.as_str());
            if let Err(e) = save_index(&self.index_path, &index) {
                warn!(error = %e, "failed to persist cache index after purge");
            }
            debug!(key = %key, "purged stale cache entry");
            None
        }
    }

    /// Copies `source` into the cache under the canonical name for
    /// `(content, kind)`, records it in the index, and evicts over-capacity
    /// entries.
    ///
    /// On any I/O failure during the copy the original `source` path is
    /// handed back with `cached: false` and the index is left untouched.
    pub fn store(&self, content: &str, kind: ContentKind, source: &Path) -> StoreOutcome {
        let key = ContentKey::derive(content, kind);
        let mut index = self.index.lock().unwrap();
        let filename = key.filename(kind);
        let target = self.root.join(&filename);
        if let Err(e) = std::fs::copy(source, &target) {
            warn!(error = %e, key = %key, "failed to copy artifact into cache");
            return StoreOutcome {
                path: source.to_path_buf(),
                cached: false,
            };
        }
        index.insert(key.as_str().to_string(), CacheEntry::new(filename, kind));
        self.evict_over_capacity(&mut index);
        if let Err(e) = save_index(&self.index_path, &index) {
            warn!(error = %e, "failed to persist cache index after store");
        }
        StoreOutcome {
            path: target,
            cached: true,
        }
    }

    // Strict LRU by last access, not insertion order. Runs after every
    // insert, with the index lock held.
    fn evict_over_capacity(&self, index: &mut IndexMap) {
        if index.len() <= self.max_entries {
            return;
        }
        let mut by_age: Vec<(String, DateTime<Utc>)> = index
            .iter()
            .map(|(key, entry)| (key.clone(), entry.last_accessed))
            .collect();
        by_age.sort_by_key(|(_, at)| *at);
        let excess = index.len() - self.max_entries;
        for (key, _) in by_age.into_iter().take(excess) {
            if let Some(entry) = index.remove(&key) {
                let path = self.root.join(&entry.filename);
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(error = %e, path = %path.display(), "failed to delete evicted file");
                }
                info!(key = %key, "evicted cache entry");
            }
        }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.index.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_source(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn store_then_lookup_returns_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentCache::open(dir.path().join("cache"), 10).unwrap();
        let source = write_source(dir.path(), "a.txt", b"once upon a time");

        let stored = cache.store("Luna_courage", ContentKind::Story, &source);
        assert!(stored.cached);
        let hit = cache.lookup("Luna_courage", ContentKind::Story).unwrap();
        assert_eq!(std::fs::read(hit).unwrap(), b"once upon a time");
    }

    #[test]
    fn cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cache");
        let source = write_source(dir.path(), "a.txt", b"persistent");
        {
            let cache = ContentCache::open(&root, 10).unwrap();
            cache.store("Luna_courage", ContentKind::Story, &source);
        }
        let reopened = ContentCache::open(&root, 10).unwrap();
        let hit = reopened.lookup("Luna_courage", ContentKind::Story).unwrap();
        assert_eq!(std::fs::read(hit).unwrap(), b"persistent");
    }

    #[test]
    fn repeated_store_keeps_one_entry_and_refreshes_created_at() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentCache::open(dir.path().join("cache"), 10).unwrap();
        let source = write_source(dir.path(), "a.txt", b"v1");

        let first = cache.store("Luna_courage", ContentKind::Story, &source);
        let first_created = {
            let index = cache.index.lock().unwrap();
            index.values().next().unwrap().created_at
        };
        std::thread::sleep(Duration::from_millis(5));
        let second = cache.store("Luna_courage", ContentKind::Story, &source);
        assert_eq!(first.path, second.path);
        assert_eq!(cache.len(), 1);
        let second_created = {
            let index = cache.index.lock().unwrap();
            index.values().next().unwrap().created_at
        };
        assert!(second_created > first_created);
    }

    #[test]
    fn eviction_keeps_most_recently_accessed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentCache::open(dir.path().join("cache"), 3).unwrap();
        let source = write_source(dir.path(), "a.bin", b"payload");

        for name in ["one", "two", "three"] {
            cache.store(name, ContentKind::Binary, &source);
            std::thread::sleep(Duration::from_millis(5));
        }
        // Bump "one" so "two" becomes the oldest.
        assert!(cache.lookup("one", ContentKind::Binary).is_some());
        std::thread::sleep(Duration::from_millis(5));

        cache.store("four", ContentKind::Binary, &source);
        assert_eq!(cache.len(), 3);
        assert!(cache.lookup("two", ContentKind::Binary).is_none());
        assert!(cache.lookup("one", ContentKind::Binary).is_some());
        assert!(cache.lookup("three", ContentKind::Binary).is_some());
        assert!(cache.lookup("four", ContentKind::Binary).is_some());
    }

    #[test]
    fn eviction_bound_holds_after_many_stores() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentCache::open(dir.path().join("cache"), 5).unwrap();
        let source = write_source(dir.path(), "a.bin", b"payload");
        for i in 0..20 {
            cache.store(&format!("entry_{}", i), ContentKind::Binary, &source);
        }
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn stale_entry_is_purged_on_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentCache::open(dir.path().join("cache"), 10).unwrap();
        let source = write_source(dir.path(), "a.bin", b"payload");

        let stored = cache.store("ghost", ContentKind::Binary, &source);
        assert_eq!(cache.len(), 1);
        std::fs::remove_file(&stored.path).unwrap();

        assert!(cache.lookup("ghost", ContentKind::Binary).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn store_failure_returns_original_path_uncached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentCache::open(dir.path().join("cache"), 10).unwrap();
        let missing = dir.path().join("does_not_exist.bin");

        let outcome = cache.store("orphan", ContentKind::Binary, &missing);
        assert!(!outcome.cached);
        assert_eq!(outcome.path, missing);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn corrupt_index_is_a_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cache");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join(INDEX_FILENAME), b"not json at all").unwrap();

        let cache = ContentCache::open(&root, 10).unwrap();
        assert!(cache.is_empty());
    }
}
