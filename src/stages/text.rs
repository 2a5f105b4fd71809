//! Story text generation, cache-wrapped.

use crate::cache::{ContentCache, ContentKind};
use crate::providers::TextProvider;
use crate::Result;
use lru::LruCache;
use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// Most recent distinct (name, theme) pairs kept in process memory,
// independent of the disk cache.
const MEMO_CAPACITY: usize = 50;

/// Story generator with two cache tiers: a process-level memo of recent
/// `(name, theme)` pairs and the shared disk cache. For text the cached file
/// *is* the artifact; a disk hit is read back directly.
pub struct StoryGenerator {
    provider: Arc<dyn TextProvider>,
    memo: Mutex<LruCache<(String, String), String>>,
}

impl StoryGenerator {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        let capacity = NonZeroUsize::new(MEMO_CAPACITY).expect("memo capacity is nonzero");
        Self {
            provider,
            memo: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Generates (or recalls) the story for `name` and `theme`.
    pub async fn generate(&self, cache: &ContentCache, name: &str, theme: &str) -> Result<String> {
        let memo_key = (name.to_string(), theme.to_string());
        if let Some(text) = self.memo.lock().unwrap().get(&memo_key) {
            return Ok(text.clone());
        }

        let content_key = format!("{}_{}", name, theme);
        if let Some(path) = cache.lookup(&content_key, ContentKind::Story) {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    info!("using cached story");
                    self.memo.lock().unwrap().put(memo_key, text.clone());
                    return Ok(text);
                }
                Err(e) => warn!(error = %e, "failed to read cached story"),
            }
        }

        let text = self.provider.generate(&story_prompt(name, theme)).await?;

        // Best-effort write-through; the generated text is returned either way.
        match write_scratch(&text) {
            Ok(scratch) => {
                cache.store(&content_key, ContentKind::Story, scratch.path());
            }
            Err(e) => warn!(error = %e, "failed to stage story for caching"),
        }
        self.memo.lock().unwrap().put(memo_key, text.clone());
        Ok(text)
    }
}

fn story_prompt(name: &str, theme: &str) -> String {
    format!(
        "You are a children's story writer. Write a long, beautiful fairy \
         tale about '{}' with '{}' as the main character, in the warm tone \
         of a parent reading to a child.",
        theme, name
    )
}

fn write_scratch(text: &str) -> std::io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(file)
}
