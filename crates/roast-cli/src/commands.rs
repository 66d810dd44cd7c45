//! Command handlers. Each prints its JSON result to stdout; logs go to stderr.

use std::path::Path;

use anyhow::Context;
use roast_core::{AudioArtifact, BatchResponse, ProfileRecord, RemoteStatus, VideoSubmission};
use roast_persona::Classifier;
use roast_pipeline::{BatchOptions, Orchestrator};
use serde_json::json;

fn live_orchestrator() -> anyhow::Result<Orchestrator> {
    let config = roast_core::load_app_config()?;
    tracing::debug!(config = ?config, "loaded configuration");
    roast_pipeline::build_live_orchestrator(&config).context("failed to build pipeline")
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_roast(
    identifiers: Vec<String>,
    generate_video: bool,
    callback_url: Option<String>,
) -> anyhow::Result<()> {
    let orchestrator = live_orchestrator()?;
    let options = BatchOptions {
        generate_video,
        callback_url,
    };
    let batch = orchestrator.run_batch(&identifiers, &options).await?;

    tracing::info!(
        processed = batch.processed(),
        successful = batch.successful(),
        "roast batch complete"
    );
    print_json(&BatchResponse::from(&batch))
}

pub(crate) fn run_classify(path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let profile: ProfileRecord = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid profile record", path.display()))?;

    let thresholds = roast_core::load_network_thresholds()?;
    tracing::debug!(
        high = thresholds.high,
        medium = thresholds.medium,
        "classifying with network thresholds"
    );
    let result = Classifier::new(thresholds.high, thresholds.medium).classify(&profile);
    print_json(&result)
}

pub(crate) async fn run_video(audio: &Path, image_url: Option<String>) -> anyhow::Result<()> {
    let bytes = std::fs::read(audio)
        .with_context(|| format!("failed to read {}", audio.display()))?;
    let submission = VideoSubmission {
        audio: AudioArtifact::new(bytes, None)?,
        avatar_url: image_url,
    };

    let orchestrator = live_orchestrator()?;
    let job = orchestrator.render_video(&submission).await?;
    print_json(&json!({
        "talkId": job.talk_id(),
        "status": job.state().as_str(),
        "videoUrl": job.result_url(),
        "processingTime": job.processing_time_label(),
        "error": job.error(),
    }))
}

pub(crate) async fn run_status(talk_id: &str) -> anyhow::Result<()> {
    let orchestrator = live_orchestrator()?;
    let status = orchestrator.video_status(talk_id).await?;
    let body = match status {
        RemoteStatus::Pending { status } => json!({ "talkId": talk_id, "status": status }),
        RemoteStatus::Done { result_url } => {
            json!({ "talkId": talk_id, "status": "done", "videoUrl": result_url })
        }
        RemoteStatus::Errored { message } => {
            json!({ "talkId": talk_id, "status": "error", "error": message })
        }
        RemoteStatus::Rejected { message } => {
            json!({ "talkId": talk_id, "status": "rejected", "error": message })
        }
    };
    print_json(&body)
}
