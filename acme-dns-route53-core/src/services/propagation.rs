//! Change submission and propagation wait
//!
//! One call walks `SUBMITTED -> POLLING -> INSYNC`. The first status check runs
//! right after submission; later checks follow the [`PollPolicy`] delays. The
//! wait ends with an error when a check fails more often than the policy
//! tolerates, when the attempt or time bound is reached, or when the caller
//! cancels.

use std::sync::Arc;

use tokio::time::{Instant, sleep};

use acme_dns_route53_provider::{ChangeInfo, ChangeRequest, ChangeStatus, ZoneRecordApi};

use crate::error::{ChallengeError, ChallengeResult};
use crate::types::PollPolicy;
use crate::utils::cancellation::Cancellation;

/// Submits record changes and blocks until the provider reports them INSYNC.
pub struct PropagationWaiter {
    api: Arc<dyn ZoneRecordApi>,
    policy: PollPolicy,
}

impl PropagationWaiter {
    #[must_use]
    pub fn new(api: Arc<dyn ZoneRecordApi>, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Submit `change` once, then wait for it to propagate.
    ///
    /// The submission itself is not cancellable: once sent, the change exists on
    /// the provider side whether or not anyone waits for it.
    pub async fn apply(
        &self,
        change: &ChangeRequest,
        cancellation: &Cancellation,
    ) -> ChallengeResult<ChangeInfo> {
        let submitted = self.api.submit_change(change).await.map_err(|source| {
            ChallengeError::Submission {
                action: change.action.as_str().to_string(),
                record: change.record.name.clone(),
                zone_id: change.zone_id.clone(),
                source,
            }
        })?;

        log::info!(
            "Submitted {} {} as change {}",
            change.action.as_str(),
            change.record.name,
            submitted.id
        );

        self.wait_for_change(&submitted.id, cancellation).await
    }

    /// Poll `change_id` until INSYNC.
    pub async fn wait_for_change(
        &self,
        change_id: &str,
        cancellation: &Cancellation,
    ) -> ChallengeResult<ChangeInfo> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut consecutive_failures: u32 = 0;

        loop {
            if cancellation.is_cancelled() {
                return Err(cancelled(change_id));
            }

            attempts += 1;
            let polled = tokio::select! {
                () = cancellation.cancelled() => return Err(cancelled(change_id)),
                polled = self.api.get_change(change_id) => polled,
            };

            match polled {
                Ok(info) if info.status == ChangeStatus::InSync => {
                    log::info!(
                        "Change {change_id} is INSYNC after {attempts} check(s) ({}s)",
                        started.elapsed().as_secs()
                    );
                    return Ok(info);
                }
                Ok(info) => {
                    consecutive_failures = 0;
                    log::info!(
                        "Change {change_id} is {}, waiting for it to be processed (check {attempts})",
                        info.status.as_str()
                    );
                }
                Err(source) => {
                    if consecutive_failures >= self.policy.poll_error_retries {
                        log::error!("Status check of change {change_id} failed: {source}");
                        return Err(ChallengeError::Propagation {
                            change_id: change_id.to_string(),
                            source,
                        });
                    }
                    consecutive_failures += 1;
                    log::warn!(
                        "Status check of change {change_id} failed ({consecutive_failures}/{}): {source}",
                        self.policy.poll_error_retries
                    );
                }
            }

            if self
                .policy
                .max_attempts
                .is_some_and(|max| attempts >= max)
            {
                return Err(timed_out(change_id, attempts, started));
            }

            let mut delay = self.policy.delay(attempts - 1);
            if let Some(max_wait) = self.policy.max_wait {
                let remaining = max_wait.saturating_sub(started.elapsed());
                if remaining.is_zero() {
                    return Err(timed_out(change_id, attempts, started));
                }
                delay = delay.min(remaining);
            }

            log::debug!("Checking change {change_id} again in {}s", delay.as_secs());
            tokio::select! {
                () = cancellation.cancelled() => return Err(cancelled(change_id)),
                () = sleep(delay) => {}
            }
        }
    }
}

fn cancelled(change_id: &str) -> ChallengeError {
    log::warn!("Stopped waiting for change {change_id}: cancelled");
    ChallengeError::Cancelled {
        change_id: change_id.to_string(),
    }
}

fn timed_out(change_id: &str, attempts: u32, started: Instant) -> ChallengeError {
    let elapsed_secs = started.elapsed().as_secs();
    log::error!(
        "Gave up on change {change_id} after {attempts} check(s) ({elapsed_secs}s), still pending"
    );
    ChallengeError::PropagationTimeout {
        change_id: change_id.to_string(),
        attempts,
        elapsed_secs,
    }
}
