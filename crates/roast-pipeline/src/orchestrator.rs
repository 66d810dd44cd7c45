//! Batch orchestration: acquisition, then a bounded number of concurrent
//! item-pipelines (classify, script, audio, optional video).
//!
//! Item failures are recorded on the item and never abort the batch. Only
//! input validation and a batch-fatal acquisition error surface as `Err`.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use roast_core::{
    Acquired, AudioArtifact, BatchResponse, BatchResult, CollaboratorError, ItemFailure,
    ItemResult, JobBackend, JobState, PersonaResult, ProfileRecord, ProfileSource, RemoteStatus,
    ScriptWriter, SpeechSynthesizer, Stage, VideoJob, VideoSubmission,
};
use roast_persona::Classifier;
use tokio::time::{timeout_at, Instant};

use crate::callback::CallbackClient;
use crate::clock::Clock;
use crate::error::PipelineError;
use crate::poller::{JobPoller, PollPolicy};
use crate::script::parse_script;

pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;
pub const DEFAULT_BATCH_DEADLINE: Duration = Duration::from_secs(900);

const NO_AUDIO_FOR_VIDEO: &str = "no audio available for video generation";

/// The external services one batch talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub profiles: Arc<dyn ProfileSource>,
    pub writer: Arc<dyn ScriptWriter>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub video: Arc<dyn JobBackend<Input = VideoSubmission>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Upper bound on concurrently running item-pipelines.
    pub max_in_flight: usize,
    /// Wall-clock budget for a whole batch, measured from the start of
    /// `run_batch`.
    pub batch_deadline: Duration,
    /// Polling for videos rendered inside a batch.
    pub primary_poll: PollPolicy,
    /// Polling for standalone video renders.
    pub short_poll: PollPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            batch_deadline: DEFAULT_BATCH_DEADLINE,
            primary_poll: PollPolicy::primary(),
            short_poll: PollPolicy::short(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub generate_video: bool,
    pub callback_url: Option<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            generate_video: true,
            callback_url: None,
        }
    }
}

pub struct Orchestrator {
    collaborators: Collaborators,
    settings: PipelineSettings,
    classifier: Classifier,
    primary_poller: JobPoller,
    short_poller: JobPoller,
    callback: CallbackClient,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        collaborators: Collaborators,
        settings: PipelineSettings,
        callback: CallbackClient,
    ) -> Self {
        Self {
            collaborators,
            classifier: Classifier::default(),
            primary_poller: JobPoller::new(settings.primary_poll),
            short_poller: JobPoller::new(settings.short_poll),
            settings,
            callback,
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the clock both pollers wait on.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.primary_poller = JobPoller::with_clock(self.settings.primary_poll, clock.clone());
        self.short_poller = JobPoller::with_clock(self.settings.short_poll, clock);
        self
    }

    #[must_use]
    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Runs every identifier through the pipeline and returns one result per
    /// identifier, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] for an empty list or a blank
    /// identifier, and [`PipelineError::AcquisitionFailed`] when the profile
    /// source rejects the batch as a whole.
    pub async fn run_batch(
        &self,
        identifiers: &[String],
        options: &BatchOptions,
    ) -> Result<BatchResult, PipelineError> {
        validate(identifiers)?;

        let deadline = Instant::now() + self.settings.batch_deadline;
        tracing::info!(
            items = identifiers.len(),
            generate_video = options.generate_video,
            max_in_flight = self.settings.max_in_flight,
            "batch started"
        );

        let acquired =
            match timeout_at(deadline, self.collaborators.profiles.acquire(identifiers)).await {
                Ok(Ok(entries)) => entries,
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "batch acquisition failed");
                    return Err(PipelineError::AcquisitionFailed(e));
                }
                Err(_) => {
                    tracing::warn!(
                        items = identifiers.len(),
                        "batch deadline exceeded during acquisition"
                    );
                    let results = identifiers
                        .iter()
                        .map(|id| ItemResult::failed(id.clone(), deadline_failure("acquisition")))
                        .collect();
                    return Ok(self.finish(results, options).await);
                }
            };

        if acquired.len() > identifiers.len() {
            tracing::warn!(
                expected = identifiers.len(),
                returned = acquired.len(),
                "profile source returned extra entries; ignoring them"
            );
        }

        let mut entries = acquired.into_iter();
        let work: Vec<(usize, String, Acquired)> = identifiers
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let entry = entries.next().unwrap_or_else(|| {
                    Err(CollaboratorError::Malformed(
                        "no acquisition result returned for this identifier".to_string(),
                    ))
                });
                (index, id.clone(), entry)
            })
            .collect();

        let generate_video = options.generate_video;
        let outcomes: Vec<(usize, ItemResult)> = stream::iter(work)
            .map(|(index, identifier, entry)| {
                self.run_item(index, identifier, entry, generate_video, deadline)
            })
            .buffer_unordered(self.settings.max_in_flight.max(1))
            .collect()
            .await;

        let mut slots: Vec<Option<ItemResult>> = vec![None; identifiers.len()];
        for (index, item) in outcomes {
            slots[index] = Some(item);
        }
        let results = slots
            .into_iter()
            .zip(identifiers)
            .map(|(slot, id)| {
                slot.unwrap_or_else(|| {
                    ItemResult::failed(id.clone(), deadline_failure("item scheduling"))
                })
            })
            .collect();

        Ok(self.finish(results, options).await)
    }

    /// Renders one talking-head video outside a batch, with the short poll
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the job cannot be submitted.
    pub async fn render_video(
        &self,
        submission: &VideoSubmission,
    ) -> Result<VideoJob, CollaboratorError> {
        self.short_poller
            .submit_and_poll(self.collaborators.video.as_ref(), submission)
            .await
    }

    /// Single status check of an existing video job.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the check itself fails.
    pub async fn video_status(&self, talk_id: &str) -> Result<RemoteStatus, CollaboratorError> {
        self.collaborators.video.check(talk_id).await
    }

    /// Classifies a single profile with this pipeline's thresholds.
    #[must_use]
    pub fn classify(&self, profile: &ProfileRecord) -> PersonaResult {
        self.classifier.classify(profile)
    }

    /// Standalone speech synthesis, outside any batch.
    ///
    /// # Errors
    ///
    /// Returns the synthesizer error, or [`CollaboratorError::Malformed`]
    /// when the synthesizer returned no audio.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> Result<AudioArtifact, CollaboratorError> {
        let raw = self
            .collaborators
            .speech
            .synthesize_with_voice(text, voice_id)
            .await?;
        AudioArtifact::new(raw.bytes, raw.mime_type.as_deref())
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))
    }

    async fn run_item(
        &self,
        index: usize,
        identifier: String,
        acquired: Acquired,
        generate_video: bool,
        deadline: Instant,
    ) -> (usize, ItemResult) {
        let profile = match acquired {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(profile = %identifier, error = %e, "profile acquisition failed");
                let failure = ItemFailure::new(Stage::Acquisition, e.to_string());
                return (index, ItemResult::failed(identifier, failure));
            }
        };

        let mut item = ItemResult::pending(identifier);
        item.display_name.clone_from(&profile.display_name);

        let persona = self.classifier.classify(&profile);
        item.persona = Some(persona.clone());

        let script = match timeout_at(
            deadline,
            self.collaborators.writer.complete(&persona, &profile),
        )
        .await
        {
            Ok(Ok(completion)) => match parse_script(persona.persona, &completion) {
                Ok(script) => script,
                Err(e) => return (index, fail(item, Stage::Script, e.to_string())),
            },
            Ok(Err(e)) => return (index, fail(item, Stage::Script, e.to_string())),
            Err(_) => return (index, expire(item, "script generation")),
        };
        let text = script.text().to_string();
        item.script = Some(script);

        let audio = match timeout_at(deadline, self.collaborators.speech.synthesize(&text)).await {
            Ok(Ok(raw)) => match AudioArtifact::new(raw.bytes, raw.mime_type.as_deref()) {
                Ok(audio) => audio,
                Err(e) => return (index, fail(item, Stage::Audio, e.to_string())),
            },
            Ok(Err(e)) => return (index, fail(item, Stage::Audio, e.to_string())),
            Err(_) => return (index, expire(item, "audio synthesis")),
        };
        item.audio = Some(audio.clone());
        item.success = true;

        if generate_video {
            self.attach_video(&mut item, audio, deadline).await;
        }

        tracing::info!(
            profile = %item.identifier,
            persona = ?item.persona.as_ref().map(|p| p.persona),
            video = item.video.as_ref().map_or("skipped", |j| j.state().as_str()),
            "item finished"
        );
        (index, item)
    }

    /// Video is best-effort: every outcome other than `Done` lands in
    /// `video_error` and leaves `success` untouched.
    async fn attach_video(&self, item: &mut ItemResult, audio: AudioArtifact, deadline: Instant) {
        let submission = VideoSubmission {
            audio,
            avatar_url: None,
        };
        let polled = timeout_at(
            deadline,
            self.primary_poller
                .submit_and_poll(self.collaborators.video.as_ref(), &submission),
        )
        .await;

        match polled {
            Ok(Ok(job)) => {
                if job.state() != JobState::Done {
                    let message = job.error().map_or_else(
                        || format!("video ended in state {}", job.state()),
                        str::to_string,
                    );
                    tracing::warn!(
                        profile = %item.identifier,
                        talk_id = %job.talk_id(),
                        state = %job.state(),
                        error = %message,
                        "video generation did not finish"
                    );
                    item.video_error = Some(message);
                }
                item.video = Some(job);
            }
            Ok(Err(e)) => {
                tracing::warn!(profile = %item.identifier, error = %e, "video submission failed");
                item.video_error = Some(format!("video submission failed: {e}"));
            }
            Err(_) => {
                tracing::warn!(
                    profile = %item.identifier,
                    "batch deadline exceeded during video generation"
                );
                item.video_error = Some("video generation exceeded the batch deadline".to_string());
            }
        }
    }

    async fn finish(&self, results: Vec<ItemResult>, options: &BatchOptions) -> BatchResult {
        let mut batch = BatchResult {
            results,
            video_requested: options.generate_video,
        };
        if batch.video_requested {
            for item in batch.results.iter_mut().filter(|r| r.audio.is_none()) {
                item.video_error
                    .get_or_insert_with(|| NO_AUDIO_FOR_VIDEO.to_string());
            }
        }

        tracing::info!(
            processed = batch.processed(),
            successful = batch.successful(),
            videos_generated = ?batch.videos_generated(),
            "batch finished"
        );

        if let Some(url) = options.callback_url.as_deref() {
            self.callback.deliver(url, &BatchResponse::from(&batch)).await;
        }
        batch
    }
}

fn validate(identifiers: &[String]) -> Result<(), PipelineError> {
    if identifiers.is_empty() {
        return Err(PipelineError::Validation(
            "at least one identifier is required".to_string(),
        ));
    }
    if let Some(position) = identifiers.iter().position(|id| id.trim().is_empty()) {
        return Err(PipelineError::Validation(format!(
            "identifier at position {position} is blank"
        )));
    }
    Ok(())
}

fn deadline_failure(during: &str) -> ItemFailure {
    ItemFailure::new(
        Stage::Deadline,
        format!("batch deadline exceeded during {during}"),
    )
}

fn fail(mut item: ItemResult, stage: Stage, message: String) -> ItemResult {
    tracing::warn!(profile = %item.identifier, stage = %stage, error = %message, "item failed");
    item.failure = Some(ItemFailure::new(stage, message));
    item
}

fn expire(mut item: ItemResult, during: &str) -> ItemResult {
    tracing::warn!(profile = %item.identifier, during, "batch deadline exceeded");
    item.failure = Some(deadline_failure(during));
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_empty_and_blank() {
        assert!(matches!(validate(&[]), Err(PipelineError::Validation(_))));

        let ids = vec!["a".to_string(), "  ".to_string()];
        match validate(&ids) {
            Err(PipelineError::Validation(msg)) => assert!(msg.contains("position 1")),
            other => panic!("expected validation error, got {other:?}"),
        }

        assert!(validate(&["a".to_string()]).is_ok());
    }

    #[test]
    fn default_options_request_video() {
        let options = BatchOptions::default();
        assert!(options.generate_video);
        assert!(options.callback_url.is_none());
    }

    #[test]
    fn default_settings() {
        let settings = PipelineSettings::default();
        assert_eq!(settings.max_in_flight, 4);
        assert_eq!(settings.batch_deadline, Duration::from_secs(900));
        assert_eq!(settings.short_poll.max_attempts, 30);
    }
}
