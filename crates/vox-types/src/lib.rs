//! Shared types for the voxrelay pipeline.
//!
//! Defines the per-request job identity, the transcription job status
//! vocabulary, and the success payload returned to callers. Everything here
//! is request-scoped; nothing outlives a single orchestration.

pub mod job;
pub mod reply;

pub use job::{JobId, JobPoll, JobStatus};
pub use reply::SpokenReply;
