//! The ask endpoint: decode, orchestrate, respond.

use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use vox_pipeline::PipelineError;
use vox_types::SpokenReply;

/// Request body for `POST /api/ask`.
///
/// The audio field is always standard base64; there is no raw-bytes
/// fallback. A payload that fails to decode is rejected outright.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Base64-encoded audio of the spoken question.
    pub audio: String,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("upstream failure: {0}")]
    UpstreamFailure(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamFailure(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::InvalidInput(_) => ApiError::BadRequest(e.to_string()),
            PipelineError::TranscriptionTimeout => ApiError::Timeout(e.to_string()),
            PipelineError::Cancelled => ApiError::Unavailable(e.to_string()),
            PipelineError::Store(_)
            | PipelineError::Transcription(_)
            | PipelineError::TranscriptionFailed(_)
            | PipelineError::Generate(_)
            | PipelineError::Synth(_) => ApiError::UpstreamFailure(e.to_string()),
            PipelineError::Internal(_) => ApiError::InternalServerError(e.to_string()),
        }
    }
}

/// Handler for `POST /api/ask`.
///
/// Success is a complete `{answerText, audioUrl}` payload; any failure is a
/// single `{error}` body with a non-200 status. Never a partial payload.
pub async fn ask_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<SpokenReply>, ApiError> {
    let audio = base64::engine::general_purpose::STANDARD
        .decode(payload.audio.as_bytes())
        .map_err(|_| {
            ApiError::BadRequest("could not decode base64 audio payload".to_string())
        })?;

    let reply = state
        .orchestrator
        .run(audio, state.cancel_rx.clone())
        .await
        .map_err(|e| {
            tracing::warn!("request failed: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(reply))
}
