//! Readiness evaluator — decides between ready, keep polling, and abort.
//!
//! The evaluator never samples the wall clock; callers pass `now` in.
//! Reference: the rollout-status check `kubectl rollout status` performs
//! for daemon sets, extended with a ready threshold and a deadline.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use tollgate_state::{ReadyThreshold, ReleaseDescriptor, WorkloadStatusSnapshot};

use crate::verdict::{DeadlineExceeded, NotReady, ReadinessVerdict};

/// Point in time after which a non-ready rollout is failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub expires_at: DateTime<Utc>,
    /// Window the deadline was derived from, reported in the verdict.
    pub progress_deadline_seconds: u64,
}

impl Deadline {
    /// Deadline of a phase that began at `from` and may last `seconds`.
    pub fn after(from: DateTime<Utc>, seconds: u64) -> Self {
        let window = i64::try_from(seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            expires_at: from.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC),
            progress_deadline_seconds: seconds,
        }
    }

    /// Deadline of the release's current rollout phase.
    pub fn for_release(release: &ReleaseDescriptor) -> Self {
        Self::after(
            release.last_transition_time(),
            release.progress_deadline_seconds(),
        )
    }

    /// True once `now` reaches the deadline.
    pub fn is_exceeded(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Evaluate a workload snapshot against a ready threshold and deadline.
///
/// A stale snapshot is retryable without consulting the deadline: the
/// control plane has not started reconciling the latest spec yet.
pub fn evaluate(
    snapshot: &WorkloadStatusSnapshot,
    threshold: ReadyThreshold,
    deadline: &Deadline,
    now: DateTime<Utc>,
) -> ReadinessVerdict {
    if snapshot.is_stale() {
        return ReadinessVerdict::Retryable(NotReady::StaleObservation {
            generation: snapshot.generation,
            observed_generation: snapshot.observed_generation,
        });
    }

    let still_rolling_out = snapshot.updated_count < snapshot.desired_count;
    let required = threshold.required_replicas(snapshot.desired_count);
    let below_threshold = snapshot.available_count < required;

    // Rollout progress takes priority over availability in the reason.
    let pending = if still_rolling_out {
        NotReady::RolloutInProgress {
            updated: snapshot.updated_count,
            desired: snapshot.desired_count,
        }
    } else if below_threshold {
        NotReady::BelowAvailabilityThreshold {
            available: snapshot.available_count,
            required,
            threshold_percent: threshold.percent(),
        }
    } else {
        return ReadinessVerdict::Ready;
    };

    if deadline.is_exceeded(now) {
        return ReadinessVerdict::DeadlineExceeded(DeadlineExceeded {
            progress_deadline_seconds: deadline.progress_deadline_seconds,
            pending,
        });
    }

    ReadinessVerdict::Retryable(pending)
}
