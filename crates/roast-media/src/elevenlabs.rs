//! Speech synthesis through the ElevenLabs text-to-speech API.

use async_trait::async_trait;
use reqwest::Client;
use roast_core::{CollaboratorError, RawAudio, SpeechSynthesizer};
use serde::Serialize;

use crate::error::MediaError;
use crate::http::{build_client, check_status, normalize_base_url};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const OUTPUT_FORMAT: &str = "mp3_44100_128";
const SERVICE: &str = "elevenlabs";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

pub struct ElevenLabsSpeech {
    client: Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    base_url: String,
}

impl ElevenLabsSpeech {
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        voice_id: &str,
        model_id: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MediaError> {
        Self::with_base_url(
            api_key,
            voice_id,
            model_id,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the client cannot be constructed, or
    /// [`MediaError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        voice_id: &str,
        model_id: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MediaError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_key: api_key.to_owned(),
            voice_id: voice_id.to_owned(),
            model_id: model_id.to_owned(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Converts `text` to MP3 audio with the configured voice.
    ///
    /// The payload is returned as-is; emptiness is checked by the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] on transport failure or a non-2xx status.
    pub async fn convert(&self, text: &str) -> Result<RawAudio, MediaError> {
        self.convert_with_voice(text, &self.voice_id).await
    }

    /// # Errors
    ///
    /// Returns a [`MediaError`] on transport failure or a non-2xx status.
    pub async fn convert_with_voice(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<RawAudio, MediaError> {
        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{voice_id}", self.base_url))
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(RawAudio { bytes, mime_type })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSpeech {
    async fn synthesize(&self, text: &str) -> Result<RawAudio, CollaboratorError> {
        let audio = self.convert(text).await?;
        tracing::debug!(bytes = audio.bytes.len(), "speech synthesized");
        Ok(audio)
    }

    async fn synthesize_with_voice(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> Result<RawAudio, CollaboratorError> {
        let voice = voice_id.unwrap_or(&self.voice_id);
        let audio = self.convert_with_voice(text, voice).await?;
        tracing::debug!(voice, bytes = audio.bytes.len(), "speech synthesized");
        Ok(audio)
    }
}
