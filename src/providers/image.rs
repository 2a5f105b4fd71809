//! Image-synthesis client (stable-image endpoint, multipart form).

use super::{transport_error, ImageProvider};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;

// The upstream endpoint wants a fixed seed for reproducible renders.
const RENDER_SEED: &str = "1234";

/// Client for the stable-image generation endpoint.
pub struct StabilityImageClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl StabilityImageClient {
    pub fn builder() -> StabilityImageClientBuilder {
        StabilityImageClientBuilder::new()
    }
}

#[async_trait]
impl ImageProvider for StabilityImageClient {
    async fn generate(&self, prompt: &str, size: &str) -> Result<Bytes> {
        let (width, height) = parse_size(size);
        let form = reqwest::multipart::Form::new()
            .text("prompt", prompt.to_string())
            .text("model", self.model.clone())
            .text("output_format", "png")
            .text("height", height.to_string())
            .text("width", width.to_string())
            .text("seed", RENDER_SEED);
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Accept", "image/*")
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("image synthesis", e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error("image synthesis", e))?;
        if !status.is_success() {
            let body_str = String::from_utf8_lossy(&bytes);
            return Err(Error::provider(format!(
                "image API error ({}): {}",
                status, body_str
            )));
        }
        Ok(bytes)
    }
}

// "512x512" -> (512, 512); anything unparsable falls back to 512.
fn parse_size(size: &str) -> (u32, u32) {
    match size.split_once('x') {
        Some((w, h)) => (
            w.trim().parse().unwrap_or(512),
            h.trim().parse().unwrap_or(512),
        ),
        None => (512, 512),
    }
}

pub struct StabilityImageClientBuilder {
    model: Option<String>,
    api_key: Option<String>,
    endpoint: Option<String>,
    timeout_secs: u64,
}

impl StabilityImageClientBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            endpoint: None,
            timeout_secs: 120,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<StabilityImageClient> {
        let model = self
            .model
            .unwrap_or_else(|| "stable-diffusion-xl-512-v1-0".to_string());
        let api_key = self
            .api_key
            .or_else(|| std::env::var("STABILITY_API_KEY").ok())
            .ok_or_else(|| Error::configuration("API key required"))?;
        let endpoint = self.endpoint.unwrap_or_else(|| {
            "https://api.stability.ai/v2beta/stable-image/generate/core".to_string()
        });
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(StabilityImageClient {
            http_client,
            endpoint,
            api_key,
            model,
        })
    }
}

impl Default for StabilityImageClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_size;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("1024x1024"), (1024, 1024));
        assert_eq!(parse_size("512x768"), (512, 768));
        assert_eq!(parse_size("garbage"), (512, 512));
    }
}
