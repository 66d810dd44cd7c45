//! Standalone video rendering and status lookup.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use roast_core::{AudioArtifact, JobState, RemoteStatus, VideoSubmission};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_upstream_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RenderVideoRequest {
    pub audio_base64: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RenderVideoResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub talk_id: String,
    pub processing_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VideoStatusResponse {
    pub talk_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub(super) async fn render_video(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RenderVideoRequest>,
) -> Result<Json<RenderVideoResponse>, ApiError> {
    let encoded = body
        .audio_base64
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "validation_error", "audio data is required")
        })?;
    let audio = AudioArtifact::from_base64(&encoded, None)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let submission = VideoSubmission {
        audio,
        avatar_url: body.image_url.filter(|u| !u.trim().is_empty()),
    };
    let job = state
        .orchestrator
        .render_video(&submission)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    let done = job.state() == JobState::Done;
    Ok(Json(RenderVideoResponse {
        success: done,
        video_url: job.result_url().map(str::to_string),
        talk_id: job.talk_id().to_string(),
        processing_time: job.processing_time_label(),
        error: (!done).then(|| job.error().unwrap_or("video did not finish").to_string()),
    }))
}

pub(super) async fn get_video_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(talk_id): Path<String>,
) -> Result<Json<VideoStatusResponse>, ApiError> {
    let status = state
        .orchestrator
        .video_status(&talk_id)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    let (label, video_url, error) = match status {
        RemoteStatus::Pending { status } => (status, None, None),
        RemoteStatus::Done { result_url } => (JobState::Done.to_string(), Some(result_url), None),
        RemoteStatus::Errored { message } => (JobState::Errored.to_string(), None, Some(message)),
        RemoteStatus::Rejected { message } => (JobState::Rejected.to_string(), None, Some(message)),
    };

    Ok(Json(VideoStatusResponse {
        talk_id,
        status: label,
        video_url,
        error,
    }))
}
