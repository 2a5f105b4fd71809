//! Text-completion client (chat completions endpoint).

use super::{transport_error, TextProvider};
use crate::{Error, Result};
use async_trait::async_trait;

/// Client for chat-completion style text generation.
pub struct OpenAiTextClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiTextClient {
    pub fn builder() -> OpenAiTextClientBuilder {
        OpenAiTextClientBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextProvider for OpenAiTextClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let endpoint = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });
        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("text completion", e))?;
        let status = response.status();
        if !status.is_success() {
            let body_str = response.text().await.unwrap_or_default();
            return Err(Error::provider(format!(
                "text completion API error ({}): {}",
                status, body_str
            )));
        }
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| transport_error("text completion", e))?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::provider("text completion response missing content"))
    }
}

pub struct OpenAiTextClientBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
}

impl OpenAiTextClientBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
            max_tokens: 16384,
            temperature: 0.5,
            timeout_secs: 60,
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

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<OpenAiTextClient> {
        let model = self
            .model
            .ok_or_else(|| Error::configuration("Model must be specified"))?;
        let api_key = self
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| Error::configuration("API key required"))?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(OpenAiTextClient {
            http_client,
            base_url,
            api_key,
            model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        })
    }
}

impl Default for OpenAiTextClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
