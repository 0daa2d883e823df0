//! Pipeline configuration with per-field defaults.

use serde::Deserialize;
use std::time::Duration;

/// Tunable settings for one orchestration run. Every field has a documented
/// default and can be overridden from the server's TOML config.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Bucket holding temporary audio uploads and transcript containers.
    #[serde(default = "default_temp_bucket")]
    pub temp_bucket: String,

    /// Key prefix for temporary audio uploads.
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,

    /// Bucket holding synthesized answer audio. Named independently of the
    /// temp bucket so outputs can carry a longer retention policy.
    #[serde(default = "default_output_bucket")]
    pub output_bucket: String,

    /// Key prefix for synthesized answer audio.
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Language hint passed to the transcription service.
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Text-generation model identifier.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Maximum output tokens requested from the generator.
    #[serde(default = "default_max_answer_tokens")]
    pub max_answer_tokens: u32,

    /// Generator sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Persona system prompt sent with every generation request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Voice identity for speech synthesis.
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    /// Synthesis engine variant.
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Audio container for synthesized output.
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Signed-URL lifetime in seconds. Default: 300 (5 minutes).
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u64,

    /// Wait between transcription status checks, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum status checks before the request times out. With the default
    /// interval this bounds the wait at roughly one minute.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,
}

fn default_temp_bucket() -> String {
    "vox-temp-upload".to_string()
}

fn default_temp_prefix() -> String {
    "temp-uploads/".to_string()
}

fn default_output_bucket() -> String {
    "vox-answer-audio".to_string()
}

fn default_output_prefix() -> String {
    "answers/".to_string()
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_model_id() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_max_answer_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_system_prompt() -> String {
    "You are a friendly, patient, and clear voice assistant. Answer the \
     user's question simply and step-by-step if possible. Avoid jargon. \
     Keep responses concise but helpful."
        .to_string()
}

fn default_voice_id() -> String {
    "Joanna".to_string()
}

fn default_engine() -> String {
    "neural".to_string()
}

fn default_output_format() -> String {
    "mp3".to_string()
}

fn default_presign_expiry_secs() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_poll_max_attempts() -> u32 {
    20
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_bucket: default_temp_bucket(),
            temp_prefix: default_temp_prefix(),
            output_bucket: default_output_bucket(),
            output_prefix: default_output_prefix(),
            language_code: default_language_code(),
            model_id: default_model_id(),
            max_answer_tokens: default_max_answer_tokens(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
            voice_id: default_voice_id(),
            engine: default_engine(),
            output_format: default_output_format(),
            presign_expiry_secs: default_presign_expiry_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_max_attempts: default_poll_max_attempts(),
        }
    }
}

impl PipelineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.presign_expiry_secs, 300);
        assert_eq!(config.poll_interval_ms, 3000);
        assert_eq!(config.poll_max_attempts, 20);
        assert_eq!(config.output_format, "mp3");
        assert!(config.temp_prefix.ends_with('/'));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config: PipelineConfig = toml::from_str(
            r#"
            presign_expiry_secs = 600
            voice_id = "Matthew"
            "#,
        )
        .unwrap();
        assert_eq!(config.presign_expiry_secs, 600);
        assert_eq!(config.voice_id, "Matthew");
        assert_eq!(config.poll_max_attempts, 20);
        assert_eq!(config.temp_bucket, "vox-temp-upload");
    }
}
