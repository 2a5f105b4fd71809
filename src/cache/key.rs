//! Content key derivation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What kind of artifact a cache entry holds. Determines the on-disk
/// extension of the cached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Story,
    Image,
    Audio,
    Binary,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Binary => "binary",
        }
    }

    /// File extension for cached artifacts of this kind. Story text is
    /// opaque to the cache and shares the binary fallback.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Image => ".png",
            Self::Audio => ".mp3",
            Self::Story | Self::Binary => ".bin",
        }
    }
}

/// Deterministic digest of `(kind, content)`.
///
/// Identical inputs produce the same key across process restarts; the digest
/// is content-derived, never random.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey {
    hash: String,
}

impl ContentKey {
    pub fn derive(content: &str, kind: ContentKind) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_str().as_bytes());
        hasher.update(b"_");
        hasher.update(content.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Canonical filename for this key within the cache root.
    pub fn filename(&self, kind: ContentKind) -> String {
        format!("{}{}", self.hash, kind.extension())
    }
}

impl std::fmt::Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Short, bounded tag for an illustration prompt, used as its cache content
/// key. The full prompt is long; the tag keeps the key readable while
/// staying content-derived (stable across restarts).
pub fn image_prompt_tag(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let n = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % 1_000_000;
    format!("img_{}", n)
}
