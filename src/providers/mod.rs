//! External generation providers.
//!
//! The pipeline depends on three collaborators, each behind a trait so tests
//! can inject failures: text completion, image synthesis, and speech
//! synthesis. Default `reqwest`-backed clients are provided for the
//! production endpoints; every call carries a client-level timeout and maps
//! transport or non-2xx outcomes to [`Error::Provider`], with deadline
//! expiries kept distinguishable.

mod image;
mod speech;
mod text;

pub use image::{StabilityImageClient, StabilityImageClientBuilder};
pub use speech::{OpenAiSpeechClient, OpenAiSpeechClientBuilder, Voice};
pub use text::{OpenAiTextClient, OpenAiTextClientBuilder};

use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// Text-completion collaborator.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Image-synthesis collaborator. `size` is `"{width}x{height}"`.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str, size: &str) -> Result<Bytes>;
}

/// Speech-synthesis collaborator.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn synthesize(&self, text: &str, voice: Voice, speed: f32) -> Result<Bytes>;
}

/// Map a reqwest failure to a provider error, keeping timeouts
/// distinguishable from other transport failures.
pub(crate) fn transport_error(what: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::provider_timeout(format!("{} request timed out: {}", what, e))
    } else {
        Error::provider(format!("{} request failed: {}", what, e))
    }
}
