//! Readiness verdicts.

use serde::Serialize;
use thiserror::Error;

/// Why a workload is still converging.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotReady {
    /// The control plane has not reported status for the latest spec.
    #[error(
        "waiting for rollout to finish: observed generation {observed_generation} less than desired generation {generation}"
    )]
    StaleObservation {
        generation: i64,
        observed_generation: i64,
    },

    /// Some replicas still run the previous spec.
    #[error("waiting for rollout to finish: {updated} out of {desired} new pods have been updated")]
    RolloutInProgress { updated: u32, desired: u32 },

    /// Too few updated replicas are available.
    #[error(
        "waiting for rollout to finish: {available} of {required} (readyThreshold {threshold_percent}%) updated pods are available"
    )]
    BelowAvailabilityThreshold {
        available: u32,
        required: u32,
        threshold_percent: u32,
    },
}

/// The rollout stayed non-ready past its progress deadline.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("exceeded its progressDeadlineSeconds: {progress_deadline_seconds}")]
pub struct DeadlineExceeded {
    pub progress_deadline_seconds: u64,
    /// The condition that was still holding when the deadline passed.
    pub pending: NotReady,
}

/// Outcome of a single readiness evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum ReadinessVerdict {
    /// Converged; nothing to wait for.
    Ready,
    /// Still converging; poll again on the next tick.
    Retryable(NotReady),
    /// Abort the rollout.
    DeadlineExceeded(DeadlineExceeded),
}

impl ReadinessVerdict {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// False only for `DeadlineExceeded`.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::DeadlineExceeded(_))
    }

    /// Collapse the verdict into `Ok(())` or the error describing it.
    pub fn into_result(self) -> Result<(), VerdictError> {
        match self {
            Self::Ready => Ok(()),
            Self::Retryable(reason) => Err(VerdictError::Retryable(reason)),
            Self::DeadlineExceeded(exceeded) => Err(VerdictError::DeadlineExceeded(exceeded)),
        }
    }
}

/// A non-ready verdict as an error value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerdictError {
    #[error(transparent)]
    Retryable(NotReady),

    #[error(transparent)]
    DeadlineExceeded(DeadlineExceeded),
}

impl VerdictError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }
}

impl From<VerdictError> for ReadinessVerdict {
    fn from(err: VerdictError) -> Self {
        match err {
            VerdictError::Retryable(reason) => Self::Retryable(reason),
            VerdictError::DeadlineExceeded(exceeded) => Self::DeadlineExceeded(exceeded),
        }
    }
}
