//! Shared data model, collaborator interfaces, and configuration for the
//! persona roast pipeline.

pub mod app_config;
pub mod artifacts;
pub mod batch;
pub mod collaborators;
pub mod config;
pub mod job;
pub mod persona;
pub mod profile;
pub mod wire;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use artifacts::{ArtifactError, AudioArtifact, ScriptArtifact};
pub use batch::{BatchResult, ItemFailure, ItemResult, Stage};
pub use collaborators::{
    Acquired, CollaboratorError, JobBackend, ProfileSource, RawAudio, ScriptWriter,
    SpeechSynthesizer, VideoSubmission,
};
pub use config::{
    load_app_config, load_app_config_from_env, load_network_thresholds, NetworkThresholds,
};
pub use job::{JobState, RemoteStatus, VideoJob};
pub use persona::{Persona, PersonaResult, UNKNOWN_PERSONA_LABEL};
pub use profile::{ExperienceEntry, PostSummary, PostingCadence, ProfileRecord, SkillEntry};
pub use wire::{BatchResponse, ItemResultView};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
