//! Error taxonomy for the request pipeline.
//!
//! Every variant aborts the remainder of the pipeline. Cleanup actions run
//! on the way out regardless of which stage failed, and their own failures
//! are logged, never allowed to mask the primary error.

use thiserror::Error;
use vox_store::StoreError;

/// Errors from the transcription job controller.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Network-level or service-level failure talking to the job API.
    #[error("transcription transport error: {0}")]
    Transport(String),

    /// The result container existed but did not hold a transcript.
    #[error("malformed transcription result: {0}")]
    MalformedResult(String),
}

impl From<reqwest::Error> for TranscribeError {
    fn from(e: reqwest::Error) -> Self {
        TranscribeError::Transport(e.to_string())
    }
}

/// Errors from the answer generator client. The three variants separate the
/// layers so a caller can tell which one failed: the wire, the response
/// shape, or the service itself.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Network, auth, or throttling failure before a well-formed reply.
    #[error("generator transport error: {0}")]
    Transport(String),

    /// A reply arrived but carried no extractable content block.
    #[error("malformed generator response: {0}")]
    MalformedResponse(String),

    /// A well-formed reply reporting a service-side error (e.g. a
    /// content-safety rejection).
    #[error("generator service error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for GenerateError {
    fn from(e: reqwest::Error) -> Self {
        GenerateError::Transport(e.to_string())
    }
}

/// Errors from the speech synthesizer client.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Network-level failure.
    #[error("synthesizer transport error: {0}")]
    Transport(String),

    /// The service rejected the request.
    #[error("synthesizer service error: {0}")]
    Service(String),

    /// Input text exceeds the per-call limit. Propagated, never truncated.
    #[error("synthesis input too large: {size} bytes (limit: {limit} bytes)")]
    InputTooLarge { size: usize, limit: usize },
}

impl From<reqwest::Error> for SynthError {
    fn from(e: reqwest::Error) -> Self {
        SynthError::Transport(e.to_string())
    }
}

/// Request-level errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing, empty, or undecodable audio payload.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Object storage operation failed (uploads and fetches abort the
    /// request; deletes are swallowed by the cleanup phase).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The job API itself failed (start, poll, or result fetch).
    #[error(transparent)]
    Transcription(#[from] TranscribeError),

    /// The transcription service reported job failure; carries the
    /// service's reason verbatim.
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Polling exhausted its attempt budget without a terminal status, or
    /// a completed job yielded an empty transcript.
    #[error("transcription did not complete in time")]
    TranscriptionTimeout,

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Synth(#[from] SynthError),

    /// The caller cancelled the request mid-flight.
    #[error("request cancelled")]
    Cancelled,

    /// Catch-all for unanticipated orchestration failures.
    #[error("internal error: {0}")]
    Internal(String),
}
