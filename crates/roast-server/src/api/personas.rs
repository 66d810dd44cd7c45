//! Stand-alone classification of a profile the caller already holds.

use axum::{extract::State, Extension, Json};
use roast_core::{PersonaResult, ProfileRecord};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) async fn classify_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(profile): Json<ProfileRecord>,
) -> Result<Json<PersonaResult>, ApiError> {
    if profile.identifier().trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "profile identifier is required",
        ));
    }

    let result = state.orchestrator.classify(&profile);
    tracing::info!(
        profile = %profile.identifier(),
        persona = %result.persona,
        confidence = result.confidence,
        "profile classified"
    );
    Ok(Json(result))
}
