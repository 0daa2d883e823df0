//! Transcription job controller.
//!
//! Jobs are an external resource keyed by the request's job identity. The
//! controller starts a job against an uploaded object, answers single
//! non-blocking status checks, fetches the completed result container from
//! object storage, and tears the job down. The polling policy itself lives
//! in the orchestrator; timeout budget is a request-level concern.

use crate::error::TranscribeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vox_store::ObjectStore;
use vox_types::JobPoll;

/// Parameters for starting an asynchronous transcription job. Doubles as
/// the wire body for the job API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartJobRequest {
    #[serde(rename = "jobName")]
    pub job_name: String,
    /// URI of the uploaded source audio (e.g. `s3://bucket/key`).
    #[serde(rename = "mediaUri")]
    pub media_uri: String,
    #[serde(rename = "languageCode")]
    pub language_code: String,
    /// Where the service writes the result container.
    #[serde(rename = "outputBucket")]
    pub output_bucket: String,
    #[serde(rename = "outputKey")]
    pub output_key: String,
}

/// The asynchronous speech-to-text service as the orchestrator needs it.
#[async_trait]
pub trait TranscriptionApi: Send + Sync {
    /// Submits a new job. The service writes its result container to the
    /// requested output location once the job completes.
    async fn start(&self, request: StartJobRequest) -> Result<(), TranscribeError>;

    /// One non-blocking status check.
    async fn poll(&self, job_name: &str) -> Result<JobPoll, TranscribeError>;

    /// Deletes the job record. Best-effort at the call site: the
    /// orchestrator logs and swallows failures.
    async fn teardown(&self, job_name: &str) -> Result<(), TranscribeError>;
}

/// REST client for the transcription job API.
#[derive(Debug, Clone)]
pub struct HttpTranscribeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTranscribeClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    fn job_url(&self, job_name: &str) -> String {
        format!("{}/v1/jobs/{}", self.endpoint, job_name)
    }
}

#[async_trait]
impl TranscriptionApi for HttpTranscribeClient {
    async fn start(&self, request: StartJobRequest) -> Result<(), TranscribeError> {
        let resp = self
            .client
            .post(format!("{}/v1/jobs", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TranscribeError::Transport(format!(
                "start job {} failed: {}",
                request.job_name,
                resp.status()
            )));
        }
        Ok(())
    }

    async fn poll(&self, job_name: &str) -> Result<JobPoll, TranscribeError> {
        let resp = self
            .client
            .get(self.job_url(job_name))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TranscribeError::Transport(format!(
                "poll job {} failed: {}",
                job_name,
                resp.status()
            )));
        }

        resp.json::<JobPoll>()
            .await
            .map_err(|e| TranscribeError::MalformedResult(format!("job status body: {}", e)))
    }

    async fn teardown(&self, job_name: &str) -> Result<(), TranscribeError> {
        let resp = self
            .client
            .delete(self.job_url(job_name))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() && resp.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(TranscribeError::Transport(format!(
                "delete job {} failed: {}",
                job_name,
                resp.status()
            )));
        }
        Ok(())
    }
}

/// Result container written by the transcription service, in the shape
/// `{"results":{"transcripts":[{"transcript":"..."}]}}`.
#[derive(Debug, Deserialize)]
struct TranscriptDocument {
    results: TranscriptResults,
}

#[derive(Debug, Deserialize)]
struct TranscriptResults {
    transcripts: Vec<TranscriptEntry>,
}

#[derive(Debug, Deserialize)]
struct TranscriptEntry {
    transcript: String,
}

/// Fetches the completed job's result container from object storage and
/// extracts the first transcript entry. Fails closed: any shape deviation
/// is a `MalformedResult`, never a silent empty string.
pub async fn fetch_result(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<String, TranscribeError> {
    let bytes = store
        .get(bucket, key)
        .await
        .map_err(|e| TranscribeError::Transport(format!("transcript fetch: {}", e)))?;

    parse_transcript(&bytes)
}

fn parse_transcript(bytes: &[u8]) -> Result<String, TranscribeError> {
    let doc: TranscriptDocument = serde_json::from_slice(bytes)
        .map_err(|e| TranscribeError::MalformedResult(format!("result container: {}", e)))?;

    doc.results
        .transcripts
        .into_iter()
        .next()
        .map(|entry| entry.transcript)
        .ok_or_else(|| {
            TranscribeError::MalformedResult("result container holds no transcript entry".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_transcript_entry() {
        let doc = br#"{"results":{"transcripts":[{"transcript":"How do I restart my phone?"},{"transcript":"ignored"}]}}"#;
        assert_eq!(
            parse_transcript(doc).unwrap(),
            "How do I restart my phone?"
        );
    }

    #[test]
    fn empty_transcript_list_is_malformed() {
        let doc = br#"{"results":{"transcripts":[]}}"#;
        assert!(matches!(
            parse_transcript(doc),
            Err(TranscribeError::MalformedResult(_))
        ));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        assert!(matches!(
            parse_transcript(br#"{"transcripts":["text"]}"#),
            Err(TranscribeError::MalformedResult(_))
        ));
        assert!(matches!(
            parse_transcript(b"not json"),
            Err(TranscribeError::MalformedResult(_))
        ));
    }

    #[test]
    fn start_request_uses_camel_case_wire_names() {
        let req = StartJobRequest {
            job_name: "vox-transcribe-1".into(),
            media_uri: "s3://vox-temp-upload/temp-uploads/1.wav".into(),
            language_code: "en-US".into(),
            output_bucket: "vox-temp-upload".into(),
            output_key: "transcripts/vox-transcribe-1.json".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("jobName").is_some());
        assert!(json.get("mediaUri").is_some());
        assert!(json.get("outputKey").is_some());
    }
}
