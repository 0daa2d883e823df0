//! The request orchestrator: sequences upload, transcription, generation,
//! synthesis, and link issuance for one audio question.
//!
//! From the caller's perspective a run is atomic: it yields either a
//! complete [`SpokenReply`] or a single [`PipelineError`], never a partial
//! payload. Temporary resources (the uploaded audio object and the
//! transcription job) are cleaned up best-effort on every exit path once
//! they exist.

use crate::config::PipelineConfig;
use crate::error::{GenerateError, PipelineError};
use crate::generate::AnswerGenerator;
use crate::synthesize::SpeechSynthesizer;
use crate::transcribe::{self, StartJobRequest, TranscriptionApi};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;
use vox_store::ObjectStore;
use vox_types::{JobId, JobStatus, SpokenReply};

/// Resource names derived from one request's job identity. Fresh per
/// request, so concurrent invocations cannot collide.
#[derive(Debug)]
struct JobResources {
    id: JobId,
    temp_key: String,
    job_name: String,
    transcript_key: String,
}

impl JobResources {
    fn derive(config: &PipelineConfig) -> Self {
        let id = JobId::generate();
        let job_name = format!("vox-transcribe-{}", id);
        Self {
            temp_key: format!("{}{}.wav", config.temp_prefix, id),
            transcript_key: format!("transcripts/{}.json", job_name),
            job_name,
            id,
        }
    }

    fn media_uri(&self, config: &PipelineConfig) -> String {
        format!("s3://{}/{}", config.temp_bucket, self.temp_key)
    }
}

/// Which temporary resources a run has created so far. Drives the
/// compensating cleanup on the way out.
#[derive(Debug, Default)]
struct Progress {
    audio_uploaded: bool,
    job_started: bool,
}

/// Sequences one request through all external collaborators. Dependencies
/// are injected at construction so tests can substitute doubles; nothing
/// here is a process-wide singleton.
pub struct Orchestrator {
    store: Arc<dyn ObjectStore>,
    transcriber: Arc<dyn TranscriptionApi>,
    generator: Arc<dyn AnswerGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        transcriber: Arc<dyn TranscriptionApi>,
        generator: Arc<dyn AnswerGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            transcriber,
            generator,
            synthesizer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs one full request: decoded audio in, answer text plus signed
    /// audio link out.
    ///
    /// `cancel` is observed between poll attempts; a cancelled request
    /// stops polling promptly and still runs its cleanup phase.
    pub async fn run(
        &self,
        audio: Vec<u8>,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<SpokenReply, PipelineError> {
        if audio.is_empty() {
            return Err(PipelineError::InvalidInput(
                "audio payload is empty".to_string(),
            ));
        }
        if *cancel.borrow() {
            return Err(PipelineError::Cancelled);
        }

        let resources = JobResources::derive(&self.config);
        tracing::info!(job_id = %resources.id, bytes = audio.len(), "starting request");

        // Transcription stage with unconditional best-effort cleanup of the
        // temp object and job, whatever the stage's outcome.
        let mut progress = Progress::default();
        let transcript_result = self
            .transcribe_stage(audio, &resources, &mut cancel, &mut progress)
            .await;
        self.cleanup(&resources, &progress).await;
        let transcript = transcript_result?;

        tracing::info!(job_id = %resources.id, "transcription complete");

        let answer = self
            .generator
            .generate(
                &self.config.system_prompt,
                &transcript,
                self.config.max_answer_tokens,
                self.config.temperature,
            )
            .await?;
        if answer.is_empty() {
            return Err(
                GenerateError::MalformedResponse("generator returned empty text".into()).into(),
            );
        }

        let audio_bytes = self
            .synthesizer
            .synthesize(
                &answer,
                &self.config.voice_id,
                &self.config.engine,
                &self.config.output_format,
            )
            .await?;

        // Output objects live in their own namespace, independent of the
        // job identity, so they can carry a longer retention policy.
        let output_key = format!(
            "{}{}.{}",
            self.config.output_prefix,
            Uuid::new_v4(),
            self.config.output_format
        );
        self.store
            .put(
                &self.config.output_bucket,
                &output_key,
                audio_bytes,
                Some(content_type_for(&self.config.output_format)),
            )
            .await?;

        let audio_url = self
            .store
            .presign(
                &self.config.output_bucket,
                &output_key,
                self.config.presign_expiry(),
            )
            .await?;

        tracing::info!(job_id = %resources.id, output_key = %output_key, "request complete");

        Ok(SpokenReply {
            answer_text: answer,
            audio_url,
        })
    }

    /// Uploads the audio, starts the job, and polls to a terminal outcome.
    /// Records created resources in `progress` for the cleanup phase.
    async fn transcribe_stage(
        &self,
        audio: Vec<u8>,
        resources: &JobResources,
        cancel: &mut watch::Receiver<bool>,
        progress: &mut Progress,
    ) -> Result<String, PipelineError> {
        self.store
            .put(
                &self.config.temp_bucket,
                &resources.temp_key,
                audio,
                Some("audio/wav"),
            )
            .await?;
        progress.audio_uploaded = true;

        self.transcriber
            .start(StartJobRequest {
                job_name: resources.job_name.clone(),
                media_uri: resources.media_uri(&self.config),
                language_code: self.config.language_code.clone(),
                output_bucket: self.config.temp_bucket.clone(),
                output_key: resources.transcript_key.clone(),
            })
            .await?;
        progress.job_started = true;

        for attempt in 1..=self.config.poll_max_attempts {
            let poll = self.transcriber.poll(&resources.job_name).await?;
            tracing::debug!(job = %resources.job_name, attempt, status = ?poll.status, "poll");

            if !poll.status.is_terminal() {
                self.wait_interval(cancel).await?;
                continue;
            }

            if poll.status == JobStatus::Failed {
                return Err(PipelineError::TranscriptionFailed(
                    poll.failure_reason
                        .unwrap_or_else(|| "unknown reason".to_string()),
                ));
            }

            let text = transcribe::fetch_result(
                self.store.as_ref(),
                &self.config.temp_bucket,
                &resources.transcript_key,
            )
            .await?;
            // A completed job must yield non-empty text; anything else is
            // treated as a timeout-class failure.
            if text.is_empty() {
                return Err(PipelineError::TranscriptionTimeout);
            }
            return Ok(text);
        }

        Err(PipelineError::TranscriptionTimeout)
    }

    /// Sleeps one poll interval, racing the cancellation channel so a
    /// cancelled request stops waiting promptly. A dropped sender counts
    /// as cancellation.
    async fn wait_interval(
        &self,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<(), PipelineError> {
        let sleep = tokio::time::sleep(self.config.poll_interval());
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                () = &mut sleep => return Ok(()),
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        return Err(PipelineError::Cancelled);
                    }
                }
            }
        }
    }

    /// Compensating action: removes the temp audio object and the
    /// transcription job if they were created. Failures are logged and
    /// swallowed; they never override the primary outcome.
    async fn cleanup(&self, resources: &JobResources, progress: &Progress) {
        if progress.audio_uploaded {
            if let Err(e) = self
                .store
                .delete(&self.config.temp_bucket, &resources.temp_key)
                .await
            {
                tracing::warn!(key = %resources.temp_key, "failed to delete temp audio object: {}", e);
            }
        }
        if progress.job_started {
            if let Err(e) = self.transcriber.teardown(&resources.job_name).await {
                tracing::warn!(job = %resources.job_name, "failed to tear down transcription job: {}", e);
            }
        }
    }
}

fn content_type_for(output_format: &str) -> &'static str {
    match output_format {
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}
