//! Builds a production orchestrator from `AppConfig`.

use std::sync::Arc;

use roast_core::AppConfig;
use roast_media::{AnthropicScriptWriter, DidVideoClient, ElevenLabsSpeech, MediaError};
use roast_persona::Classifier;
use roast_profiles::{LinkedInSource, PostsClient, ProfileClient, ProfileError};
use thiserror::Error;

use crate::callback::CallbackClient;
use crate::orchestrator::{Collaborators, Orchestrator, PipelineSettings};
use crate::poller::PollPolicy;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("profile adapter: {0}")]
    Profile(#[from] ProfileError),

    #[error("media adapter: {0}")]
    Media(#[from] MediaError),

    #[error("callback client: {0}")]
    Callback(#[from] reqwest::Error),
}

#[must_use]
pub fn settings_from_config(config: &AppConfig) -> PipelineSettings {
    let policy = |max_attempts| PollPolicy {
        interval: config.poll_interval(),
        max_attempts,
        max_transient_failures: config.poll_max_transient_failures,
    };
    PipelineSettings {
        max_in_flight: config.max_in_flight,
        batch_deadline: config.batch_deadline(),
        primary_poll: policy(config.poll_max_attempts),
        short_poll: policy(config.short_poll_max_attempts),
    }
}

/// Wires the HTTP adapters named in `config` into an [`Orchestrator`].
///
/// # Errors
///
/// Returns [`BuildError`] if any HTTP client cannot be built or a base URL
/// override is invalid.
pub fn build_live_orchestrator(config: &AppConfig) -> Result<Orchestrator, BuildError> {
    let timeout = config.request_timeout_secs;
    let ua = config.user_agent.as_str();

    let profiles = ProfileClient::with_base_url(
        &config.profile_api_key,
        timeout,
        ua,
        &config.profile_base_url,
    )?;
    let posts = config
        .posts_api_token
        .as_deref()
        .map(|token| {
            PostsClient::with_base_url(token, timeout, ua, config.max_posts, &config.posts_base_url)
        })
        .transpose()?;
    if posts.is_none() {
        tracing::info!("APIFY_API_TOKEN not set; profiles will be classified without posts");
    }

    let writer = AnthropicScriptWriter::with_base_url(
        &config.anthropic_api_key,
        &config.anthropic_model,
        timeout,
        ua,
        &config.anthropic_base_url,
    )?;
    let speech = ElevenLabsSpeech::with_base_url(
        &config.elevenlabs_api_key,
        &config.voice_id,
        &config.tts_model,
        timeout,
        ua,
        &config.elevenlabs_base_url,
    )?;
    let video = DidVideoClient::with_base_url(
        &config.did_api_key,
        &config.avatar_url,
        timeout,
        ua,
        &config.did_base_url,
    )?;

    let collaborators = Collaborators {
        profiles: Arc::new(LinkedInSource::new(profiles, posts, config.max_in_flight)),
        writer: Arc::new(writer),
        speech: Arc::new(speech),
        video: Arc::new(video),
    };
    let callback = CallbackClient::new(config.request_timeout(), ua)?;

    Ok(Orchestrator::new(collaborators, settings_from_config(config), callback).with_classifier(
        Classifier::new(config.high_network_threshold, config.medium_network_threshold),
    ))
}
