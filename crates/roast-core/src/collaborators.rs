//! Interfaces to the external services the pipeline depends on.
//!
//! Every collaborator is an async trait object so the orchestrator can be
//! driven by HTTP adapters in production and by in-process fakes in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::artifacts::AudioArtifact;
use crate::job::RemoteStatus;
use crate::persona::PersonaResult;
use crate::profile::ProfileRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl CollaboratorError {
    /// Errors that make every remaining call to the same service pointless.
    #[must_use]
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            CollaboratorError::Unauthorized(_) | CollaboratorError::QuotaExhausted(_)
        )
    }
}

/// Per-identifier acquisition outcome.
pub type Acquired = Result<ProfileRecord, CollaboratorError>;

/// Bulk profile acquisition.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Returns one entry per input identifier, in input order.
    ///
    /// # Errors
    ///
    /// An outer `Err` means the whole batch could not be acquired.
    async fn acquire(&self, identifiers: &[String]) -> Result<Vec<Acquired>, CollaboratorError>;
}

/// Text generation for roast scripts.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    /// Returns the raw completion text. The pipeline parses it.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` when the completion request fails.
    async fn complete(
        &self,
        persona: &PersonaResult,
        profile: &ProfileRecord,
    ) -> Result<String, CollaboratorError>;
}

/// Raw synthesized speech before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAudio {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// # Errors
    ///
    /// Returns a `CollaboratorError` when synthesis fails.
    async fn synthesize(&self, text: &str) -> Result<RawAudio, CollaboratorError>;

    /// Like [`SpeechSynthesizer::synthesize`], with an optional voice override.
    ///
    /// Synthesizers with a single voice ignore the override.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` when synthesis fails.
    async fn synthesize_with_voice(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> Result<RawAudio, CollaboratorError> {
        let _ = voice_id;
        self.synthesize(text).await
    }
}

/// Input for a talking-head render.
#[derive(Debug, Clone)]
pub struct VideoSubmission {
    pub audio: AudioArtifact,
    /// Avatar image; the backend default is used when absent.
    pub avatar_url: Option<String>,
}

/// A long-running remote job: submit once, then check until terminal.
#[async_trait]
pub trait JobBackend: Send + Sync {
    type Input: Send + Sync;

    /// Submits the job and returns its remote id.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` when the job could not be created.
    async fn submit(&self, input: &Self::Input) -> Result<String, CollaboratorError>;

    /// Performs a single status check.
    ///
    /// # Errors
    ///
    /// An `Err` is a transient failure of the check itself, not a job failure.
    async fn check(&self, job_id: &str) -> Result<RemoteStatus, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auth_and_quota_are_batch_fatal() {
        assert!(CollaboratorError::Unauthorized("k".into()).is_batch_fatal());
        assert!(CollaboratorError::QuotaExhausted("c".into()).is_batch_fatal());
        assert!(!CollaboratorError::NotFound("x".into()).is_batch_fatal());
        assert!(!CollaboratorError::RateLimited("x".into()).is_batch_fatal());
        assert!(!CollaboratorError::Transport("x".into()).is_batch_fatal());
    }
}
