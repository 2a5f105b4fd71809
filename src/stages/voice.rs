//! Narration synthesis.
//!
//! Voice output is not disk-cached: the voice/speed parameter space makes
//! cached artifacts low-value. Raw bytes go straight back to the caller for
//! inline delivery or a binary response.

use crate::providers::{SpeechProvider, Voice};
use crate::Result;
use base64::Engine;
use bytes::Bytes;

/// Synthesizes narration audio for `text`.
pub async fn synthesize_narration(
    provider: &dyn SpeechProvider,
    text: &str,
    voice: Voice,
    speed: f32,
) -> Result<Bytes> {
    provider.synthesize(text, voice, speed).await
}

/// Base64-encodes audio bytes for inline delivery to mobile clients.
pub fn audio_to_base64(audio: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_encoding_round_trips() {
        let audio = b"\x00\x01\x02fake mp3 frame";
        let encoded = audio_to_base64(audio);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, audio);
    }
}
