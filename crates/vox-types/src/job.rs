//! Job identity and transcription job status.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique per-request token scoping all derived resource names.
///
/// A `JobId` is generated fresh for every inbound request and never reused,
/// so concurrent requests cannot collide on storage keys or job names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Generates a fresh random job identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of an asynchronous transcription job as reported by the service.
///
/// The client-side timed-out outcome is not a service status; it is produced
/// by the orchestrator when polling exhausts its attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Submitted,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the service will make no further transitions from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One non-blocking status check of a transcription job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPoll {
    pub status: JobStatus,
    /// Service-reported reason, present when `status` is `Failed`.
    #[serde(rename = "failureReason", skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_are_unique() {
        assert_ne!(JobId::generate(), JobId::generate());
    }

    #[test]
    fn status_wire_names_are_screaming_snake() {
        let poll: JobPoll = serde_json::from_str(r#"{"status":"IN_PROGRESS"}"#).unwrap();
        assert_eq!(poll.status, JobStatus::InProgress);
        assert!(poll.failure_reason.is_none());

        let poll: JobPoll =
            serde_json::from_str(r#"{"status":"FAILED","failureReason":"bad media"}"#).unwrap();
        assert_eq!(poll.status, JobStatus::Failed);
        assert_eq!(poll.failure_reason.as_deref(), Some("bad media"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Submitted.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
    }
}
