//! Stand-alone speech synthesis.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_upstream_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SynthesizeRequest {
    #[serde(default)]
    pub text: String,
    pub voice_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SynthesizeResponse {
    pub audio_base64: String,
    pub mime_type: String,
}

pub(super) async fn synthesize(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SynthesizeRequest>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(ApiError::new(req_id.0, "validation_error", "text is required"));
    }
    let voice_id = body.voice_id.as_deref().filter(|v| !v.trim().is_empty());

    let audio = state
        .orchestrator
        .synthesize_speech(text, voice_id)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    Ok(Json(SynthesizeResponse {
        audio_base64: audio.to_base64(),
        mime_type: audio.mime_type().to_string(),
    }))
}
