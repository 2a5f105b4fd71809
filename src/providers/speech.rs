//! Speech-synthesis client (audio/speech endpoint).

use super::{transport_error, SpeechProvider};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Known synthesis voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "alloy" => Some(Self::Alloy),
            "echo" => Some(Self::Echo),
            "fable" => Some(Self::Fable),
            "onyx" => Some(Self::Onyx),
            "nova" => Some(Self::Nova),
            "shimmer" => Some(Self::Shimmer),
            _ => None,
        }
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::Alloy
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client for text-to-speech synthesis.
pub struct OpenAiSpeechClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSpeechClient {
    pub fn builder() -> OpenAiSpeechClientBuilder {
        OpenAiSpeechClientBuilder::new()
    }
}

#[async_trait]
impl SpeechProvider for OpenAiSpeechClient {
    async fn synthesize(&self, text: &str, voice: Voice, speed: f32) -> Result<Bytes> {
        let endpoint = format!("{}/v1/audio/speech", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": voice.as_str(),
            "speed": speed,
        });
        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("speech synthesis", e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error("speech synthesis", e))?;
        if !status.is_success() {
            let body_str = String::from_utf8_lossy(&bytes);
            return Err(Error::provider(format!(
                "TTS API error ({}): {}",
                status, body_str
            )));
        }
        Ok(bytes)
    }
}

pub struct OpenAiSpeechClientBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: u64,
}

impl OpenAiSpeechClientBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
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

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<OpenAiSpeechClient> {
        let model = self.model.unwrap_or_else(|| "tts-1".to_string());
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
        Ok(OpenAiSpeechClient {
            http_client,
            base_url,
            api_key,
            model,
        })
    }
}

impl Default for OpenAiSpeechClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
