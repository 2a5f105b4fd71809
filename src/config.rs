//! Engine configuration.

use std::path::PathBuf;

/// Tunables for the generation core.
///
/// Defaults mirror the production deployment; `from_env` overlays the
/// environment variables the operators actually set.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root directory of the content cache.
    pub cache_dir: PathBuf,
    /// Destination directory for persisted user images in local mode.
    pub static_dir: PathBuf,
    /// Maximum number of cached artifacts before LRU eviction kicks in.
    pub max_cache_size: usize,
    /// Requested illustration size, `"{width}x{height}"`.
    pub image_size: String,
    /// When true, persisted artifacts go to the object store first.
    pub use_object_store: bool,
    /// Object-store bucket name.
    pub bucket: String,
    /// Text-completion model identifier.
    pub text_model: String,
    /// Speech-synthesis model identifier.
    pub tts_model: String,
    /// Image-synthesis model identifier.
    pub image_model: String,
    /// Token budget for story generation.
    pub max_tokens: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            static_dir: PathBuf::from("static/images"),
            max_cache_size: 100,
            image_size: "1024x1024".to_string(),
            use_object_store: false,
            bucket: "my-fairytale-bucket".to_string(),
            text_model: "gpt-4o-mini".to_string(),
            tts_model: "tts-1".to_string(),
            image_model: "stable-diffusion-xl-512-v1-0".to_string(),
            max_tokens: 16384,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the `USE_S3` and `S3_BUCKET` environment
    /// variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("USE_S3") {
            config.use_object_store = v.eq_ignore_ascii_case("true");
        }
        if let Ok(bucket) = std::env::var("S3_BUCKET") {
            config.bucket = bucket;
        }
        config
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_max_cache_size(mut self, max: usize) -> Self {
        self.max_cache_size = max;
        self
    }

    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = size.into();
        self
    }

    pub fn with_object_store(mut self, enabled: bool, bucket: impl Into<String>) -> Self {
        self.use_object_store = enabled;
        self.bucket = bucket.into();
        self
    }
}
