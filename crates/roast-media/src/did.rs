//! Talking-head video rendering through the D-ID talks API.
//!
//! A render is three calls: upload the audio (`POST /audios`), create a talk
//! that lip-syncs an avatar image to it (`POST /talks`), then check the talk
//! (`GET /talks/{id}`) until it finishes. Only the first two happen in
//! [`JobBackend::submit`]; checking is left to the caller's poller.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use roast_core::{CollaboratorError, JobBackend, RemoteStatus, VideoSubmission};
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::http::{build_client, check_status, normalize_base_url, read_json};

const DEFAULT_BASE_URL: &str = "https://api.d-id.com";
const SERVICE: &str = "d-id";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateTalkRequest<'a> {
    source_url: &'a str,
    script: AudioScript<'a>,
}

#[derive(Debug, Serialize)]
struct AudioScript<'a> {
    #[serde(rename = "type")]
    script_type: &'static str,
    audio_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTalkResponse {
    id: Option<String>,
}

/// Talk status payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TalkStatus {
    pub status: Option<String>,
    pub result_url: Option<String>,
    pub error: Option<TalkError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TalkError {
    pub kind: Option<String>,
    pub description: Option<String>,
}

impl TalkStatus {
    /// Maps the remote status string onto the job state machine.
    #[must_use]
    pub fn into_remote(self) -> RemoteStatus {
        match self.status.as_deref() {
            Some("done") => match self.result_url.filter(|u| !u.trim().is_empty()) {
                Some(result_url) => RemoteStatus::Done { result_url },
                None => RemoteStatus::Errored {
                    message: "talk finished without a result URL".to_string(),
                },
            },
            Some("error") => RemoteStatus::Errored {
                message: format!(
                    "video generation failed: {}",
                    self.error
                        .and_then(|e| e.description.or(e.kind))
                        .unwrap_or_else(|| "unknown error".to_string())
                ),
            },
            Some("rejected") => RemoteStatus::Rejected {
                message: "video generation was rejected, possibly for content policy reasons"
                    .to_string(),
            },
            other => RemoteStatus::Pending {
                status: other.unwrap_or("unknown").to_string(),
            },
        }
    }
}

pub struct DidVideoClient {
    client: Client,
    auth_header: String,
    default_avatar_url: String,
    base_url: String,
}

impl DidVideoClient {
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        default_avatar_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MediaError> {
        Self::with_base_url(
            api_key,
            default_avatar_url,
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
        default_avatar_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MediaError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            auth_header: basic_auth_header(api_key),
            default_avatar_url: default_avatar_url.to_owned(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Uploads audio and returns the hosted URL.
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] on transport failure, a non-2xx status, or a
    /// response without a `url`.
    pub async fn upload_audio(&self, bytes: &[u8], mime_type: &str) -> Result<String, MediaError> {
        let part = Part::bytes(bytes.to_vec())
            .file_name("audio.mp3")
            .mime_str(mime_type)?;
        let form = Form::new().part("audio", part);

        let response = self
            .client
            .post(format!("{}/audios", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        let parsed: UploadResponse = read_json(response, "audio upload").await?;
        parsed.url.ok_or(MediaError::MissingField {
            service: SERVICE,
            field: "url",
        })
    }

    /// Creates a talk and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] on transport failure, a non-2xx status, or a
    /// response without an `id`.
    pub async fn create_talk(
        &self,
        avatar_url: &str,
        audio_url: &str,
    ) -> Result<String, MediaError> {
        let request = CreateTalkRequest {
            source_url: avatar_url,
            script: AudioScript {
                script_type: "audio",
                audio_url,
            },
        };
        let response = self
            .client
            .post(format!("{}/talks", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(&request)
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        let parsed: CreateTalkResponse = read_json(response, "talk creation").await?;
        parsed.id.ok_or(MediaError::MissingField {
            service: SERVICE,
            field: "id",
        })
    }

    /// # Errors
    ///
    /// Returns a [`MediaError`] on transport failure, a non-2xx status, or an
    /// unparseable body.
    pub async fn talk_status(&self, talk_id: &str) -> Result<TalkStatus, MediaError> {
        let response = self
            .client
            .get(format!("{}/talks/{talk_id}", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        read_json(response, format!("talk {talk_id}")).await
    }
}

/// D-ID keys are sent as the Basic-auth user with an empty password.
fn basic_auth_header(api_key: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{api_key}:")))
}

#[async_trait]
impl JobBackend for DidVideoClient {
    type Input = VideoSubmission;

    async fn submit(&self, input: &VideoSubmission) -> Result<String, CollaboratorError> {
        let avatar_url = input
            .avatar_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(&self.default_avatar_url);

        let audio_url = self
            .upload_audio(input.audio.bytes(), input.audio.mime_type())
            .await?;
        tracing::debug!(audio_url = %audio_url, "audio uploaded for video");

        let talk_id = self.create_talk(avatar_url, &audio_url).await?;
        tracing::info!(talk_id = %talk_id, avatar = %avatar_url, "video talk created");
        Ok(talk_id)
    }

    async fn check(&self, job_id: &str) -> Result<RemoteStatus, CollaboratorError> {
        Ok(self.talk_status(job_id).await?.into_remote())
    }
}
