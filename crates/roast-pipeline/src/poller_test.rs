use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use roast_core::{JobState, RemoteStatus};

use super::*;

#[derive(Default)]
struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }

    fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Replays scripted check results; once exhausted every check reports pending.
struct ScriptedBackend {
    checks: Mutex<VecDeque<Result<RemoteStatus, CollaboratorError>>>,
    calls: Mutex<u32>,
}

impl ScriptedBackend {
    fn new(checks: Vec<Result<RemoteStatus, CollaboratorError>>) -> Self {
        Self {
            checks: Mutex::new(checks.into()),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl JobBackend for ScriptedBackend {
    type Input = ();

    async fn submit(&self, _input: &()) -> Result<String, CollaboratorError> {
        Ok("tlk_test".to_string())
    }

    async fn check(&self, _job_id: &str) -> Result<RemoteStatus, CollaboratorError> {
        *self.calls.lock().unwrap() += 1;
        self.checks.lock().unwrap().pop_front().unwrap_or(Ok(pending()))
    }
}

fn pending() -> RemoteStatus {
    RemoteStatus::Pending {
        status: "started".into(),
    }
}

fn done() -> RemoteStatus {
    RemoteStatus::Done {
        result_url: "https://cdn/v.mp4".into(),
    }
}

fn transport() -> CollaboratorError {
    CollaboratorError::Transport("connection reset".into())
}

fn poller(policy: PollPolicy) -> (JobPoller, Arc<RecordingClock>) {
    let clock = Arc::new(RecordingClock::default());
    (JobPoller::with_clock(policy, clock.clone()), clock)
}

#[test]
fn policies_match_documented_budgets() {
    let primary = PollPolicy::primary();
    assert_eq!(primary.interval, Duration::from_secs(10));
    assert_eq!(primary.max_attempts, 60);
    assert_eq!(primary.max_transient_failures, 5);

    let short = PollPolicy::short();
    assert_eq!(short.interval, Duration::from_secs(10));
    assert_eq!(short.max_attempts, 30);
}

#[tokio::test]
async fn done_on_first_check_waits_nothing() {
    let backend = ScriptedBackend::new(vec![Ok(done())]);
    let (poller, clock) = poller(PollPolicy::primary());

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::Done);
    assert_eq!(job.result_url(), Some("https://cdn/v.mp4"));
    assert_eq!(job.attempts(), 1);
    assert_eq!(clock.count(), 0);
    assert_eq!(job.processing_time_label(), "0 seconds");
}

#[tokio::test]
async fn waits_only_between_checks() {
    let backend = ScriptedBackend::new(vec![
        Ok(pending()),
        Ok(pending()),
        Ok(pending()),
        Ok(done()),
    ]);
    let (poller, clock) = poller(PollPolicy::primary());

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::Done);
    assert_eq!(backend.calls(), 4);
    assert_eq!(clock.count(), 3);
    assert_eq!(job.waited(), Duration::from_secs(30));
    assert_eq!(job.processing_time_label(), "30 seconds");
}

#[tokio::test]
async fn never_finishing_job_times_out_within_budget() {
    let backend = ScriptedBackend::new(vec![]);
    let policy = PollPolicy::primary();
    let (poller, clock) = poller(policy);

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::TimedOut);
    assert_eq!(backend.calls(), 60);
    assert!(clock.total() <= policy.interval * 60);
    assert!(job.error().unwrap().contains("60 checks"));
}

#[tokio::test]
async fn short_policy_stops_after_thirty_checks() {
    let backend = ScriptedBackend::new(vec![]);
    let (poller, _clock) = poller(PollPolicy::short());

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::TimedOut);
    assert_eq!(backend.calls(), 30);
}

#[tokio::test]
async fn rejected_job_stops_polling() {
    let backend = ScriptedBackend::new(vec![
        Ok(pending()),
        Ok(RemoteStatus::Rejected {
            message: "content policy".into(),
        }),
        Ok(done()),
    ]);
    let (poller, _clock) = poller(PollPolicy::primary());

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::Rejected);
    assert_eq!(job.error(), Some("content policy"));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn transient_failures_below_threshold_are_tolerated() {
    let mut checks: Vec<_> = (0..5).map(|_| Err(transport())).collect();
    checks.push(Ok(done()));
    let backend = ScriptedBackend::new(checks);
    let (poller, _clock) = poller(PollPolicy::primary());

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::Done);
    assert_eq!(job.attempts(), 6);
}

#[tokio::test]
async fn repeated_transient_failures_escalate() {
    let checks = (0..10).map(|_| Err(transport())).collect();
    let backend = ScriptedBackend::new(checks);
    let (poller, _clock) = poller(PollPolicy::primary());

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::Errored);
    assert_eq!(backend.calls(), 6);
    assert!(job.error().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn successful_check_resets_failure_run() {
    let mut checks = Vec::new();
    for _ in 0..2 {
        checks.extend((0..5).map(|_| Err(transport())));
        checks.push(Ok(pending()));
    }
    checks.push(Ok(done()));
    let backend = ScriptedBackend::new(checks);
    let (poller, _clock) = poller(PollPolicy::primary());

    let job = poller.poll(&backend, "tlk_test").await;

    assert_eq!(job.state(), JobState::Done);
    assert_eq!(backend.calls(), 13);
}

#[tokio::test]
async fn submit_and_poll_returns_job_for_submitted_id() {
    let backend = ScriptedBackend::new(vec![Ok(done())]);
    let (poller, _clock) = poller(PollPolicy::short());

    let job = poller.submit_and_poll(&backend, &()).await.unwrap();

    assert_eq!(job.talk_id(), "tlk_test");
    assert_eq!(job.state(), JobState::Done);
}
