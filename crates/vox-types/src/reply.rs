//! The success payload returned to callers.

use serde::{Deserialize, Serialize};

/// A fully assembled answer: the generated text plus a time-limited link to
/// the synthesized audio. Callers receive either both fields or a structured
/// error, never a partial payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenReply {
    /// The generated answer, verbatim from the text-generation service.
    #[serde(rename = "answerText")]
    pub answer_text: String,
    /// Signed retrieval URL for the synthesized audio. Expires after the
    /// configured interval; the stored object may outlive the link.
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_serializes_with_camel_case_keys() {
        let reply = SpokenReply {
            answer_text: "Press and hold the power button.".to_string(),
            audio_url: "https://store.example/answers/abc.mp3?expires=300".to_string(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("answerText").is_some());
        assert!(json.get("audioUrl").is_some());
    }
}
