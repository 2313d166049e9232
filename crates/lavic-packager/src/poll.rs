// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded polling of a generation job until it settles.

use std::time::Duration;

use lavic_config::model::RodinConfig;
use lavic_core::{JobHandle, JobOutcome, JobProvider, SubJobStatus};
use tracing::{debug, info, warn};

/// How often and how many times to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

impl From<&RodinConfig> for PollPolicy {
    fn from(config: &RodinConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_attempts: config.max_poll_attempts,
        }
    }
}

/// Classifies one status snapshot. `None` means keep polling.
fn settle(statuses: &[SubJobStatus]) -> Option<JobOutcome> {
    if statuses.is_empty() {
        return None;
    }
    if statuses.iter().any(|s| *s == SubJobStatus::Failed) {
        return Some(JobOutcome::Failed(statuses.to_vec()));
    }
    statuses
        .iter()
        .all(|s| *s == SubJobStatus::Done)
        .then_some(JobOutcome::Done)
}

/// Polls `handle` until every sub-job is Done, any is Failed, or the
/// attempt budget runs out.
///
/// Each attempt sleeps `interval` first. Transport errors, error statuses,
/// and empty job lists consume an attempt without ending the loop.
pub async fn poll_until_terminal(
    provider: &dyn JobProvider,
    handle: &JobHandle,
    policy: PollPolicy,
) -> JobOutcome {
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        let statuses = match provider.poll(handle).await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!(attempt, error = %e, "status poll failed");
                continue;
            }
        };
        debug!(
            attempt,
            statuses = ?statuses.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "job status"
        );

        if let Some(outcome) = settle(&statuses) {
            info!(attempt, outcome = ?outcome, "generation job settled");
            return outcome;
        }
    }

    warn!(attempts = policy.max_attempts, "generation job timed out");
    JobOutcome::TimedOut {
        attempts: policy.max_attempts,
    }
}
