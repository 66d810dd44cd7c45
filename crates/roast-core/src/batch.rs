use crate::artifacts::{AudioArtifact, ScriptArtifact};
use crate::job::{JobState, VideoJob};
use crate::persona::PersonaResult;

/// Pipeline stage an item failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquisition,
    Script,
    Audio,
    Deadline,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Acquisition => "acquisition",
            Stage::Script => "script",
            Stage::Audio => "audio",
            Stage::Deadline => "deadline",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub stage: Stage,
    pub message: String,
}

impl ItemFailure {
    #[must_use]
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

/// Outcome of one item-pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub identifier: String,
    pub display_name: Option<String>,
    pub persona: Option<PersonaResult>,
    pub script: Option<ScriptArtifact>,
    pub audio: Option<AudioArtifact>,
    pub video: Option<VideoJob>,
    pub video_error: Option<String>,
    pub success: bool,
    pub failure: Option<ItemFailure>,
}

impl ItemResult {
    #[must_use]
    pub fn pending(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: None,
            persona: None,
            script: None,
            audio: None,
            video: None,
            video_error: None,
            success: false,
            failure: None,
        }
    }

    #[must_use]
    pub fn failed(identifier: impl Into<String>, failure: ItemFailure) -> Self {
        let mut item = Self::pending(identifier);
        item.failure = Some(failure);
        item
    }

    /// Result URL of a finished video, if any.
    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.video
            .as_ref()
            .filter(|job| job.state() == JobState::Done)
            .and_then(VideoJob::result_url)
    }
}

/// Ordered outcome of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub results: Vec<ItemResult>,
    pub video_requested: bool,
}

impl BatchResult {
    #[must_use]
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Count of finished videos; `None` when video generation was not requested.
    #[must_use]
    pub fn videos_generated(&self) -> Option<usize> {
        self.video_requested.then(|| {
            self.results
                .iter()
                .filter(|r| r.video_url().is_some())
                .count()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::RemoteStatus;

    fn succeeded(id: &str, video: Option<VideoJob>) -> ItemResult {
        let mut item = ItemResult::pending(id);
        item.success = true;
        item.video = video;
        item
    }

    #[test]
    fn counts_follow_results() {
        let mut done = VideoJob::submitted("t1");
        done.apply(RemoteStatus::Done {
            result_url: "https://v/1.mp4".into(),
        });
        let mut rejected = VideoJob::submitted("t2");
        rejected.apply(RemoteStatus::Rejected {
            message: "nope".into(),
        });

        let batch = BatchResult {
            results: vec![
                succeeded("a", Some(done)),
                succeeded("b", Some(rejected)),
                ItemResult::failed("c", ItemFailure::new(Stage::Script, "bad json")),
            ],
            video_requested: true,
        };

        assert_eq!(batch.processed(), 3);
        assert_eq!(batch.successful(), 2);
        assert_eq!(batch.videos_generated(), Some(1));
    }

    #[test]
    fn videos_generated_absent_when_not_requested() {
        let batch = BatchResult {
            results: vec![succeeded("a", None)],
            video_requested: false,
        };
        assert_eq!(batch.videos_generated(), None);
    }

    #[test]
    fn failure_display_names_stage() {
        let f = ItemFailure::new(Stage::Audio, "empty payload");
        assert_eq!(f.to_string(), "audio failed: empty payload");
    }
}
