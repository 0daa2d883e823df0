use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::Engine;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tower::ServiceExt;
use vox_pipeline::{
    AnswerGenerator, GenerateError, Orchestrator, PipelineConfig, SpeechSynthesizer,
    StartJobRequest, SynthError, TranscribeError, TranscriptionApi,
};
use vox_server::{app, AppState};
use vox_store::MemoryObjectStore;
use vox_types::{JobPoll, JobStatus};

const ANSWER: &str = "Press and hold the power button until the menu appears.";

/// Transcription double that completes on the first poll, writing its
/// transcript container on start like the real service does.
struct InstantTranscriber {
    store: Arc<MemoryObjectStore>,
    transcript_json: Vec<u8>,
}

#[async_trait]
impl TranscriptionApi for InstantTranscriber {
    async fn start(&self, request: StartJobRequest) -> Result<(), TranscribeError> {
        self.store.insert(
            &request.output_bucket,
            &request.output_key,
            self.transcript_json.clone(),
        );
        Ok(())
    }

    async fn poll(&self, _job_name: &str) -> Result<JobPoll, TranscribeError> {
        Ok(JobPoll {
            status: JobStatus::Completed,
            failure_reason: None,
        })
    }

    async fn teardown(&self, _job_name: &str) -> Result<(), TranscribeError> {
        Ok(())
    }
}

struct FixedGenerator;

#[async_trait]
impl AnswerGenerator for FixedGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_utterance: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerateError> {
        Ok(ANSWER.to_string())
    }
}

struct FixedSynth;

#[async_trait]
impl SpeechSynthesizer for FixedSynth {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &str,
        _engine: &str,
        _output_format: &str,
    ) -> Result<Vec<u8>, SynthError> {
        Ok(vec![0x49, 0x44, 0x33])
    }
}

fn setup_app() -> (axum::Router, watch::Sender<bool>) {
    let store = Arc::new(MemoryObjectStore::new());
    let transcriber = Arc::new(InstantTranscriber {
        store: store.clone(),
        transcript_json:
            br#"{"results":{"transcripts":[{"transcript":"How do I restart my phone?"}]}}"#
                .to_vec(),
    });
    let orchestrator = Orchestrator::new(
        store,
        transcriber,
        Arc::new(FixedGenerator),
        Arc::new(FixedSynth),
        PipelineConfig::default(),
    );

    // The sender is handed back so the cancellation channel stays open for
    // the router's lifetime; dropping it reads as cancellation.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let router = app(AppState {
        orchestrator: Arc::new(orchestrator),
        cancel_rx,
    });
    (router, cancel_tx)
}

fn ask_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (app, _cancel_tx) = setup_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn ask_returns_answer_text_and_audio_url() {
    let audio = base64::engine::general_purpose::STANDARD.encode(b"riff-audio");
    let (app, _cancel_tx) = setup_app();
    let response = app
        .oneshot(ask_request(format!(r#"{{"audio":"{}"}}"#, audio)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["answerText"], ANSWER);
    assert!(json["audioUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://store.test/"));
}

#[tokio::test]
async fn invalid_base64_is_a_400_with_error_body() {
    let (app, _cancel_tx) = setup_app();
    let response = app
        .oneshot(ask_request(r#"{"audio":"not-base64!!!"}"#.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("base64"));
}

#[tokio::test]
async fn empty_audio_is_a_400() {
    // "" decodes to zero bytes; the pipeline rejects it as invalid input.
    let (app, _cancel_tx) = setup_app();
    let response = app
        .oneshot(ask_request(r#"{"audio":""}"#.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("invalid input"));
}

#[tokio::test]
async fn missing_audio_field_is_rejected() {
    let (app, _cancel_tx) = setup_app();
    let response = app
        .oneshot(ask_request(r#"{}"#.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn cors_allows_browser_origins() {
    let audio = base64::engine::general_purpose::STANDARD.encode(b"riff-audio");
    let (app, _cancel_tx) = setup_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ask")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ORIGIN, "https://app.example")
                .body(Body::from(format!(r#"{{"audio":"{}"}}"#, audio)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
