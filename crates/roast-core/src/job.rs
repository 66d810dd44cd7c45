//! Video rendering job state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Submitted,
    Processing,
    Done,
    Errored,
    Rejected,
    TimedOut,
}

impl JobState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Done | JobState::Errored | JobState::Rejected | JobState::TimedOut
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Submitted => "submitted",
            JobState::Processing => "processing",
            JobState::Done => "done",
            JobState::Errored => "error",
            JobState::Rejected => "rejected",
            JobState::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status reported by a single remote check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Any non-terminal remote status, carried verbatim for logging.
    Pending { status: String },
    Done { result_url: String },
    Errored { message: String },
    Rejected { message: String },
}

/// A submitted video job.
///
/// Only the poller mutates a job. Once the job reaches a terminal state every
/// further transition is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJob {
    talk_id: String,
    state: JobState,
    result_url: Option<String>,
    error: Option<String>,
    attempts: u32,
    waited: Duration,
}

impl VideoJob {
    #[must_use]
    pub fn submitted(talk_id: impl Into<String>) -> Self {
        Self {
            talk_id: talk_id.into(),
            state: JobState::Submitted,
            result_url: None,
            error: None,
            attempts: 0,
            waited: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn talk_id(&self) -> &str {
        &self.talk_id
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Present only when the job is `Done`.
    #[must_use]
    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn waited(&self) -> Duration {
        self.waited
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Human-readable wait time, e.g. `"40 seconds"`.
    #[must_use]
    pub fn processing_time_label(&self) -> String {
        format!("{} seconds", self.waited.as_secs())
    }

    pub fn record_attempt(&mut self) {
        if !self.is_terminal() {
            self.attempts += 1;
        }
    }

    pub fn record_wait(&mut self, wait: Duration) {
        if !self.is_terminal() {
            self.waited += wait;
        }
    }

    /// Applies a remote status, returning `true` when the state changed.
    pub fn apply(&mut self, status: RemoteStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        let before = self.state;
        match status {
            RemoteStatus::Pending { .. } => self.state = JobState::Processing,
            RemoteStatus::Done { result_url } => {
                self.state = JobState::Done;
                self.result_url = Some(result_url);
            }
            RemoteStatus::Errored { message } => {
                self.state = JobState::Errored;
                self.error = Some(message);
            }
            RemoteStatus::Rejected { message } => {
                self.state = JobState::Rejected;
                self.error = Some(message);
            }
        }
        before != self.state
    }

    /// Marks the job timed out after its attempt budget is spent.
    pub fn time_out(&mut self) {
        if !self.is_terminal() {
            self.state = JobState::TimedOut;
            self.error = Some(format!(
                "video generation timed out after {} checks",
                self.attempts
            ));
        }
    }

    /// Escalates repeated transport failures into a terminal error.
    pub fn escalate(&mut self, last_failure: &str) {
        if !self.is_terminal() {
            self.state = JobState::Errored;
            self.error = Some(format!(
                "status checks kept failing; last error: {last_failure}"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_processing() {
        let mut job = VideoJob::submitted("tlk_1");
        assert!(job.apply(RemoteStatus::Pending {
            status: "started".into()
        }));
        assert_eq!(job.state(), JobState::Processing);
        assert!(!job.apply(RemoteStatus::Pending {
            status: "started".into()
        }));
    }

    #[test]
    fn done_carries_url() {
        let mut job = VideoJob::submitted("tlk_1");
        job.apply(RemoteStatus::Done {
            result_url: "https://cdn/x.mp4".into(),
        });
        assert_eq!(job.state(), JobState::Done);
        assert_eq!(job.result_url(), Some("https://cdn/x.mp4"));
        assert!(job.error().is_none());
    }

    #[test]
    fn terminal_state_ignores_further_transitions() {
        let mut job = VideoJob::submitted("tlk_1");
        job.apply(RemoteStatus::Rejected {
            message: "bad image".into(),
        });
        job.record_attempt();
        job.record_wait(Duration::from_secs(10));
        assert!(!job.apply(RemoteStatus::Done {
            result_url: "u".into()
        }));
        job.time_out();
        assert_eq!(job.state(), JobState::Rejected);
        assert_eq!(job.error(), Some("bad image"));
        assert_eq!(job.attempts(), 0);
        assert_eq!(job.waited(), Duration::ZERO);
    }

    #[test]
    fn time_out_reports_attempts() {
        let mut job = VideoJob::submitted("tlk_1");
        job.record_attempt();
        job.record_attempt();
        job.time_out();
        assert_eq!(job.state(), JobState::TimedOut);
        assert!(job.error().unwrap().contains("2 checks"));
    }

    #[test]
    fn processing_time_label_uses_seconds() {
        let mut job = VideoJob::submitted("tlk_1");
        job.record_wait(Duration::from_secs(10));
        job.record_wait(Duration::from_secs(30));
        assert_eq!(job.processing_time_label(), "40 seconds");
    }

    #[test]
    fn terminal_states() {
        assert!(!JobState::Submitted.is_terminal());
        assert!(!JobState::Processing.is_terminal());
        assert!(JobState::Done.is_terminal());
        assert!(JobState::Errored.is_terminal());
        assert!(JobState::Rejected.is_terminal());
        assert!(JobState::TimedOut.is_terminal());
    }
}
