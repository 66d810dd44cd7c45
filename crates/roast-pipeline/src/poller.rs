//! Drives a remote job from submission to a terminal state.
//!
//! Checks happen first and waits only between checks, so a job that finishes
//! on the N-th check has waited N-1 intervals. A failed check (the status
//! call itself erroring) uses up an attempt without changing state; too many
//! failures in a row end the job as errored.

use std::sync::Arc;
use std::time::Duration;

use roast_core::{CollaboratorError, JobBackend, VideoJob};

use crate::clock::{Clock, TokioClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Consecutive failed checks tolerated before the job is escalated.
    pub max_transient_failures: u32,
}

impl PollPolicy {
    /// Ten-second interval, ten minutes of checks.
    #[must_use]
    pub fn primary() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 60,
            max_transient_failures: 5,
        }
    }

    /// Ten-second interval, five minutes of checks.
    #[must_use]
    pub fn short() -> Self {
        Self {
            max_attempts: 30,
            ..Self::primary()
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::primary()
    }
}

#[derive(Clone)]
pub struct JobPoller {
    clock: Arc<dyn Clock>,
    policy: PollPolicy,
}

impl JobPoller {
    #[must_use]
    pub fn new(policy: PollPolicy) -> Self {
        Self::with_clock(policy, Arc::new(TokioClock))
    }

    #[must_use]
    pub fn with_clock(policy: PollPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { clock, policy }
    }

    #[must_use]
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submits `input` and polls the resulting job.
    ///
    /// # Errors
    ///
    /// Returns the backend error when submission fails. Failures after
    /// submission are reported through the returned job's state.
    pub async fn submit_and_poll<B>(
        &self,
        backend: &B,
        input: &B::Input,
    ) -> Result<VideoJob, CollaboratorError>
    where
        B: JobBackend + ?Sized,
    {
        let job_id = backend.submit(input).await?;
        tracing::info!(job_id = %job_id, "job submitted");
        Ok(self.poll(backend, &job_id).await)
    }

    /// Polls an already submitted job until it is terminal or the attempt
    /// budget is spent.
    pub async fn poll<B>(&self, backend: &B, job_id: &str) -> VideoJob
    where
        B: JobBackend + ?Sized,
    {
        let policy = self.policy;
        let mut job = VideoJob::submitted(job_id);
        let mut consecutive_failures: u32 = 0;

        loop {
            job.record_attempt();
            let attempt = job.attempts();

            match backend.check(job_id).await {
                Ok(status) => {
                    consecutive_failures = 0;
                    let before = job.state();
                    if job.apply(status) {
                        tracing::info!(
                            job_id = %job_id,
                            attempt,
                            from = %before,
                            to = %job.state(),
                            "job state changed"
                        );
                    } else {
                        tracing::debug!(
                            job_id = %job_id,
                            attempt,
                            state = %job.state(),
                            "job checked"
                        );
                    }
                }
                Err(err) => {
                    consecutive_failures += 1;
                    tracing::warn!(
                        job_id = %job_id,
                        attempt,
                        consecutive_failures,
                        max_transient_failures = policy.max_transient_failures,
                        error = %err,
                        "job status check failed"
                    );
                    if consecutive_failures > policy.max_transient_failures {
                        job.escalate(&err.to_string());
                        tracing::warn!(
                            job_id = %job_id,
                            attempt,
                            "job escalated after repeated check failures"
                        );
                        return job;
                    }
                }
            }

            if job.is_terminal() {
                return job;
            }
            if attempt >= policy.max_attempts {
                job.time_out();
                tracing::warn!(
                    job_id = %job_id,
                    attempts = attempt,
                    waited_secs = job.waited().as_secs(),
                    "job timed out"
                );
                return job;
            }

            self.clock.sleep(policy.interval).await;
            job.record_wait(policy.interval);
        }
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
