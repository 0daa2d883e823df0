//! Answer generator client.
//!
//! Talks to a messages-style text-generation API: a system prompt plus a
//! single user turn, no conversation history. Response extraction takes the
//! first content block only and fails closed when none is present.

use crate::error::GenerateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The synchronous text-generation service as the orchestrator needs it.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Produces a reply to `user_utterance` under `system_prompt`.
    /// The returned text is guaranteed non-empty.
    async fn generate(
        &self,
        system_prompt: &str,
        user_utterance: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GenerateError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Typed view of the messages API response. Loose on purpose: every field
/// is optional so shape deviations surface as `MalformedResponse` during
/// extraction instead of opaque deserialization failures.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    content: Vec<ResponseBlock>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    message: Option<String>,
}

/// Extracts the reply text from a parsed response.
///
/// A body with `type == "error"` is a service-reported error even though it
/// is well-formed; anything without a non-empty first text block is
/// malformed. Blocks past the first are ignored.
fn extract_reply(response: MessagesResponse) -> Result<String, GenerateError> {
    if response.kind.as_deref() == Some("error") {
        let message = response
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "unknown service error".to_string());
        return Err(GenerateError::Service(message));
    }

    match response.content.into_iter().next().and_then(|b| b.text) {
        Some(text) if !text.is_empty() => Ok(text),
        Some(_) => Err(GenerateError::MalformedResponse(
            "first content block is empty".into(),
        )),
        None => Err(GenerateError::MalformedResponse(
            "response carries no text content block".into(),
        )),
    }
}

/// REST client for the messages-style generation API.
#[derive(Debug, Clone)]
pub struct HttpAnswerClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpAnswerClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl AnswerGenerator for HttpAnswerClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_utterance: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GenerateError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: vec![RequestBlock {
                    kind: "text",
                    text: user_utterance,
                }],
            }],
            temperature,
        };

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GenerateError::Transport(format!(
                "generation request failed: {}",
                resp.status()
            )));
        }

        let parsed = resp
            .json::<MessagesResponse>()
            .await
            .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;

        extract_reply(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> MessagesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn takes_first_text_block_only() {
        let response = parse(
            r#"{"content":[{"type":"text","text":"Press and hold the power button."},{"type":"text","text":"second block"}]}"#,
        );
        assert_eq!(
            extract_reply(response).unwrap(),
            "Press and hold the power button."
        );
    }

    #[test]
    fn missing_content_is_malformed() {
        assert!(matches!(
            extract_reply(parse(r#"{"id":"msg_1"}"#)),
            Err(GenerateError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_reply(parse(r#"{"content":[]}"#)),
            Err(GenerateError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_reply(parse(r#"{"content":[{"type":"text","text":""}]}"#)),
            Err(GenerateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn error_body_is_a_service_error_with_its_message() {
        let response =
            parse(r#"{"type":"error","error":{"message":"content rejected by safety filter"}}"#);
        match extract_reply(response) {
            Err(GenerateError::Service(msg)) => {
                assert_eq!(msg, "content rejected by safety filter")
            }
            other => panic!("expected Service error, got {:?}", other),
        }
    }

    #[test]
    fn error_body_without_message_falls_back() {
        match extract_reply(parse(r#"{"type":"error"}"#)) {
            Err(GenerateError::Service(msg)) => assert_eq!(msg, "unknown service error"),
            other => panic!("expected Service error, got {:?}", other),
        }
    }
}
