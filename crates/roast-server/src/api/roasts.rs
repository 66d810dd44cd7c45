use axum::{extract::State, Extension, Json};
use roast_core::BatchResponse;
use roast_pipeline::BatchOptions;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RoastRequest {
    #[serde(default, alias = "linkedinUrls")]
    pub identifiers: Vec<String>,
    #[serde(default = "default_generate_video")]
    pub generate_video: bool,
    pub callback_url: Option<String>,
}

fn default_generate_video() -> bool {
    true
}

pub(super) async fn create_roasts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RoastRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let options = BatchOptions {
        generate_video: body.generate_video,
        callback_url: body.callback_url.filter(|u| !u.trim().is_empty()),
    };

    let batch = state
        .orchestrator
        .run_batch(&body.identifiers, &options)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(BatchResponse::from(&batch)))
}
