//! The voxrelay request pipeline.
//!
//! One inbound audio question flows through four external collaborators:
//! object storage, an asynchronous transcription service, a text-generation
//! service, and a speech synthesizer. The [`Orchestrator`] sequences them —
//! upload, start job, bounded poll, fetch transcript, best-effort cleanup,
//! generate, synthesize, upload, presign — and returns either a complete
//! [`vox_types::SpokenReply`] or a single structured [`PipelineError`].
//!
//! Each collaborator sits behind a trait so tests can substitute doubles;
//! the `Http*` clients are the production implementations.

pub mod config;
pub mod error;
pub mod generate;
pub mod orchestrator;
pub mod synthesize;
pub mod transcribe;

pub use config::PipelineConfig;
pub use error::{GenerateError, PipelineError, SynthError, TranscribeError};
pub use generate::{AnswerGenerator, HttpAnswerClient};
pub use orchestrator::Orchestrator;
pub use synthesize::{HttpSynthClient, SpeechSynthesizer};
pub use transcribe::{HttpTranscribeClient, StartJobRequest, TranscriptionApi};
