//! JSON views of batch results as exposed over HTTP and to callbacks.

use serde::{Deserialize, Serialize};

use crate::artifacts::DEFAULT_AUDIO_MIME;
use crate::batch::{BatchResult, ItemResult};
use crate::persona::UNKNOWN_PERSONA_LABEL;

const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResultView {
    pub profile_id: String,
    pub name: String,
    pub persona: String,
    pub confidence: u8,
    pub roast_script: String,
    pub audio_base64: String,
    pub mime_type: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talk_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
}

impl From<&ItemResult> for ItemResultView {
    fn from(item: &ItemResult) -> Self {
        let (persona, confidence) = item.persona.as_ref().map_or_else(
            || (UNKNOWN_PERSONA_LABEL.to_string(), 0),
            |p| (p.persona.as_str().to_string(), p.confidence),
        );

        Self {
            profile_id: item.identifier.clone(),
            name: item
                .display_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            persona,
            confidence,
            roast_script: item
                .script
                .as_ref()
                .map(|s| s.text().to_string())
                .unwrap_or_default(),
            audio_base64: item
                .audio
                .as_ref()
                .map(crate::AudioArtifact::to_base64)
                .unwrap_or_default(),
            mime_type: item.audio.as_ref().map_or_else(
                || DEFAULT_AUDIO_MIME.to_string(),
                |a| a.mime_type().to_string(),
            ),
            success: item.success,
            error: item.failure.as_ref().map(ToString::to_string),
            video_url: item.video_url().map(str::to_string),
            video_error: item.video_error.clone(),
            talk_id: item.video.as_ref().map(|j| j.talk_id().to_string()),
            processing_time: item.video.as_ref().map(crate::VideoJob::processing_time_label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success: bool,
    pub results: Vec<ItemResultView>,
    pub processed: usize,
    pub successful: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos_generated: Option<usize>,
}

impl From<&BatchResult> for BatchResponse {
    fn from(batch: &BatchResult) -> Self {
        Self {
            success: true,
            results: batch.results.iter().map(ItemResultView::from).collect(),
            processed: batch.processed(),
            successful: batch.successful(),
            videos_generated: batch.videos_generated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{AudioArtifact, ScriptArtifact};
    use crate::batch::{ItemFailure, Stage};
    use crate::job::{RemoteStatus, VideoJob};
    use crate::persona::{Persona, PersonaResult};
    use std::time::Duration;

    #[test]
    fn unclassified_item_reports_unknown_persona() {
        let item = ItemResult::failed(
            "https://linkedin.com/in/nobody",
            ItemFailure::new(Stage::Acquisition, "profile not found"),
        );
        let view = ItemResultView::from(&item);
        assert_eq!(view.name, "Unknown");
        assert_eq!(view.persona, "Unknown");
        assert_eq!(view.confidence, 0);
        assert_eq!(view.mime_type, "audio/mpeg");
        assert_eq!(
            view.error.as_deref(),
            Some("acquisition failed: profile not found")
        );

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["profileId"], "https://linkedin.com/in/nobody");
        assert!(json.get("videoUrl").is_none());
        assert!(json.get("talkId").is_none());
    }

    #[test]
    fn finished_item_exposes_artifacts_and_video() {
        let mut job = VideoJob::submitted("tlk_9");
        job.record_wait(Duration::from_secs(20));
        job.apply(RemoteStatus::Done {
            result_url: "https://cdn/v.mp4".into(),
        });

        let mut item = ItemResult::pending("id-1");
        item.display_name = Some("Ada Lovelace".into());
        item.persona = Some(PersonaResult {
            persona: Persona::Networker,
            confidence: 80,
            reasoning: "r".into(),
            content_suggestions: vec![],
        });
        item.script = Some(ScriptArtifact::new(Persona::Networker, "Hi there.").unwrap());
        item.audio = Some(AudioArtifact::new(vec![1, 2, 3], Some("audio/mpeg")).unwrap());
        item.video = Some(job);
        item.success = true;

        let json = serde_json::to_value(ItemResultView::from(&item)).unwrap();
        assert_eq!(json["name"], "Ada Lovelace");
        assert_eq!(json["persona"], "NETWORKER");
        assert_eq!(json["confidence"], 80);
        assert_eq!(json["roastScript"], "Hi there.");
        assert_eq!(json["audioBase64"], "AQID");
        assert_eq!(json["videoUrl"], "https://cdn/v.mp4");
        assert_eq!(json["talkId"], "tlk_9");
        assert_eq!(json["processingTime"], "20 seconds");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn batch_response_omits_video_count_when_not_requested() {
        let batch = BatchResult {
            results: vec![ItemResult::pending("a")],
            video_requested: false,
        };
        let json = serde_json::to_value(BatchResponse::from(&batch)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["processed"], 1);
        assert_eq!(json["successful"], 0);
        assert!(json.get("videosGenerated").is_none());
    }
}
