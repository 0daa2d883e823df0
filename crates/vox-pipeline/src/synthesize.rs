//! Speech synthesizer client.
//!
//! The entire reply is synthesized in one call; there is no chunking or
//! streaming. Oversized input fails with `InputTooLarge` rather than being
//! truncated silently.

use crate::error::SynthError;
use async_trait::async_trait;
use serde::Serialize;

/// Maximum text input size for synthesis (64 KiB). Mirrors the service's
/// per-call limit so oversized requests fail before going over the wire.
const MAX_SYNTH_INPUT_BYTES: usize = 64 * 1024;

/// The synchronous text-to-speech service as the orchestrator needs it.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Converts `text` to an audio byte stream using the given voice,
    /// engine, and output format.
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        engine: &str,
        output_format: &str,
    ) -> Result<Vec<u8>, SynthError>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    #[serde(rename = "voiceId")]
    voice_id: &'a str,
    engine: &'a str,
    #[serde(rename = "outputFormat")]
    output_format: &'a str,
}

/// REST client for the speech synthesis API.
#[derive(Debug, Clone)]
pub struct HttpSynthClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpSynthClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthClient {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        engine: &str,
        output_format: &str,
    ) -> Result<Vec<u8>, SynthError> {
        if text.len() > MAX_SYNTH_INPUT_BYTES {
            return Err(SynthError::InputTooLarge {
                size: text.len(),
                limit: MAX_SYNTH_INPUT_BYTES,
            });
        }

        let resp = self
            .client
            .post(format!("{}/v1/speech", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&SpeechRequest {
                text,
                voice_id: voice,
                engine,
                output_format,
            })
            .send()
            .await?;

        match resp.status() {
            reqwest::StatusCode::PAYLOAD_TOO_LARGE => Err(SynthError::InputTooLarge {
                size: text.len(),
                limit: MAX_SYNTH_INPUT_BYTES,
            }),
            status if status.is_success() => Ok(resp.bytes().await?.to_vec()),
            status => Err(SynthError::Service(format!(
                "synthesis request failed: {}",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn oversized_input_is_rejected_before_the_wire() {
        // Endpoint is unreachable on purpose; the guard must fire first.
        let client = HttpSynthClient::new("http://127.0.0.1:1", "key");
        let text = "a".repeat(MAX_SYNTH_INPUT_BYTES + 1);

        let result = client.synthesize(&text, "Joanna", "neural", "mp3").await;
        match result {
            Err(SynthError::InputTooLarge { size, limit }) => {
                assert_eq!(size, MAX_SYNTH_INPUT_BYTES + 1);
                assert_eq!(limit, MAX_SYNTH_INPUT_BYTES);
            }
            other => panic!("expected InputTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn speech_request_wire_names() {
        let req = SpeechRequest {
            text: "hello",
            voice_id: "Joanna",
            engine: "neural",
            output_format: "mp3",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("voiceId").is_some());
        assert!(json.get("outputFormat").is_some());
    }
}
