//! Readiness check errors.

use thiserror::Error;

use tollgate_readiness::VerdictError;
use tollgate_state::WorkloadKind;

use crate::client::ClientError;

/// Why a primary or canary workload is not ready.
///
/// The message is status-surface text and already carries the inner
/// reason, so no variant exposes it as an error source. Callers decide
/// between polling again and aborting through
/// [`ReadinessError::is_retryable`].
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("{kind} {name}.{namespace} get query error: {error}")]
    Fetch {
        kind: WorkloadKind,
        name: String,
        namespace: String,
        error: ClientError,
    },

    #[error("primary {kind} {name}.{namespace} not ready: {reason}")]
    PrimaryNotReady {
        kind: WorkloadKind,
        name: String,
        namespace: String,
        reason: VerdictError,
    },

    #[error("canary {kind} {name}.{namespace} not ready with retryable {retryable}: {reason}")]
    CanaryNotReady {
        kind: WorkloadKind,
        name: String,
        namespace: String,
        retryable: bool,
        reason: VerdictError,
    },
}

impl ReadinessError {
    /// False only when the rollout ran past its progress deadline.
    /// Fetch failures are always retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { .. } => true,
            Self::PrimaryNotReady { reason, .. } => reason.is_retryable(),
            Self::CanaryNotReady { retryable, .. } => *retryable,
        }
    }

    /// The evaluator's verdict, when the object was fetched.
    pub fn verdict(&self) -> Option<&VerdictError> {
        match self {
            Self::Fetch { .. } => None,
            Self::PrimaryNotReady { reason, .. } | Self::CanaryNotReady { reason, .. } => {
                Some(reason)
            }
        }
    }
}
