//! Illustration generation: prompt derivation plus cache-wrapped synthesis.

use crate::cache::{image_prompt_tag, ContentCache, ContentKind};
use crate::providers::{ImageProvider, TextProvider};
use crate::{Error, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Derives a single short English scene description from the story text.
///
/// Not cached: one cheap completion call relative to image synthesis.
/// Failure here is fatal to the image branch, not to the overall job.
pub async fn derive_image_prompt(provider: &dyn TextProvider, story: &str) -> Result<String> {
    let prompt = format!(
        "You are a prompt generator for an illustration model. From the \
         following fairy tale, choose one vivid, heartwarming scene and \
         describe it in English in a single short sentence suitable for a \
         simple, child-friendly illustration. Use a soft, cute style with \
         minimal detail. No text, no words, no letters, no signs, no \
         numbers.\n\n{}",
        story
    );
    let scene = provider.generate(&prompt).await?;
    Ok(scene.trim().to_string())
}

// Fixed preamble wrapped around the derived scene description.
fn illustration_prompt(scene: &str) -> String {
    format!(
        "no text in the image. minimal detail. Please create a single, \
         simple illustration that matches the content about {}, in a \
         child-friendly style.",
        scene
    )
}

/// Color illustration stage: derive a prompt from the story, then render it,
/// keyed in the cache by a bounded tag of the derived prompt.
pub struct Illustrator {
    text_provider: Arc<dyn TextProvider>,
    image_provider: Arc<dyn ImageProvider>,
    size: String,
}

impl Illustrator {
    pub fn new(
        text_provider: Arc<dyn TextProvider>,
        image_provider: Arc<dyn ImageProvider>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            text_provider,
            image_provider,
            size: size.into(),
        }
    }

    /// Generates (or recalls) the color illustration for a story and returns
    /// its local path.
    pub async fn generate(&self, cache: &ContentCache, story: &str) -> Result<PathBuf> {
        let scene = derive_image_prompt(self.text_provider.as_ref(), story).await?;
        info!(scene = %scene, "derived illustration prompt");

        let key = image_prompt_tag(&scene);
        if let Some(path) = cache.lookup(&key, ContentKind::Image) {
            info!("using cached illustration");
            return Ok(path);
        }

        let bytes = self
            .image_provider
            .generate(&illustration_prompt(&scene), &self.size)
            .await?;

        let mut scratch = tempfile::NamedTempFile::new()?;
        scratch.write_all(&bytes)?;
        scratch.flush()?;
        let outcome = cache.store(&key, ContentKind::Image, scratch.path());
        if outcome.cached {
            Ok(outcome.path)
        } else {
            // Cache refused the artifact; keep the scratch file alive so the
            // returned path outlives this call.
            let (_file, path) = scratch
                .keep()
                .map_err(|e| Error::cache_io(e.to_string()))?;
            Ok(path)
        }
    }
}
