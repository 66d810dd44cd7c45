use roast_core::CollaboratorError;
use thiserror::Error;

/// Batch-level failures. Anything scoped to a single item is recorded on its
/// `ItemResult` instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid batch request: {0}")]
    Validation(String),

    #[error("profile acquisition failed for the whole batch: {0}")]
    AcquisitionFailed(#[source] CollaboratorError),
}
