//! Kind controller — fetches a release's workloads and checks readiness.
//!
//! One controller serves one workload kind. The primary is checked with
//! the release's primary ready threshold; the canary always with 100%,
//! so a partially updated canary never receives traffic.

use std::sync::Arc;

use tracing::{debug, info, warn};

use tollgate_readiness::{Clock, Deadline, ReadinessVerdict, SystemClock, evaluate};
use tollgate_state::{ReadyThreshold, ReleaseDescriptor, WorkloadKind, WorkloadStatusSnapshot};

use crate::client::WorkloadClient;
use crate::error::ReadinessError;

/// Which of a release's two workloads is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Primary,
    Canary,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Canary => "canary",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Readiness checks for workloads of a single kind.
#[derive(Clone)]
pub struct ReadinessController {
    kind: WorkloadKind,
    client: Arc<dyn WorkloadClient>,
    clock: Arc<dyn Clock>,
}

impl ReadinessController {
    /// Create a controller that reads the wall clock.
    pub fn new(kind: WorkloadKind, client: Arc<dyn WorkloadClient>) -> Self {
        Self {
            kind,
            client,
            clock: Arc::new(SystemClock),
        }
    }

    /// Controller for the kind the release targets.
    pub fn for_release(release: &ReleaseDescriptor, client: Arc<dyn WorkloadClient>) -> Self {
        Self::new(release.kind(), client)
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn kind(&self) -> WorkloadKind {
        self.kind
    }

    /// Fetch the primary and evaluate it against the release's threshold.
    pub async fn primary_verdict(
        &self,
        release: &ReleaseDescriptor,
    ) -> Result<ReadinessVerdict, ReadinessError> {
        let name = release.primary_name();
        self.verdict(
            Role::Primary,
            release,
            &name,
            release.primary_ready_threshold(),
        )
        .await
    }

    /// Fetch the canary and evaluate it with a full threshold.
    pub async fn canary_verdict(
        &self,
        release: &ReleaseDescriptor,
    ) -> Result<ReadinessVerdict, ReadinessError> {
        self.verdict(
            Role::Canary,
            release,
            release.canary_name(),
            ReadyThreshold::FULL,
        )
        .await
    }

    /// `Ok(())` when the primary has converged.
    pub async fn is_primary_ready(&self, release: &ReleaseDescriptor) -> Result<(), ReadinessError> {
        let name = release.primary_name();
        self.primary_verdict(release)
            .await?
            .into_result()
            .map_err(|reason| ReadinessError::PrimaryNotReady {
                kind: self.kind,
                name,
                namespace: release.namespace.clone(),
                reason,
            })
    }

    /// `Ok(())` when the canary has converged.
    ///
    /// On error, [`ReadinessError::is_retryable`] tells whether to poll
    /// again or abort the rollout.
    pub async fn is_canary_ready(&self, release: &ReleaseDescriptor) -> Result<(), ReadinessError> {
        self.canary_verdict(release)
            .await?
            .into_result()
            .map_err(|reason| ReadinessError::CanaryNotReady {
                kind: self.kind,
                name: release.canary_name().to_string(),
                namespace: release.namespace.clone(),
                retryable: reason.is_retryable(),
                reason,
            })
    }

    /// Canary check as a `(retryable, result)` pair. Ready is `(true, Ok(()))`.
    pub async fn canary_readiness(
        &self,
        release: &ReleaseDescriptor,
    ) -> (bool, Result<(), ReadinessError>) {
        match self.is_canary_ready(release).await {
            Ok(()) => (true, Ok(())),
            Err(e) => (e.is_retryable(), Err(e)),
        }
    }

    async fn verdict(
        &self,
        role: Role,
        release: &ReleaseDescriptor,
        name: &str,
        threshold: ReadyThreshold,
    ) -> Result<ReadinessVerdict, ReadinessError> {
        let namespace = release.namespace.as_str();
        let snapshot = self.fetch_snapshot(name, namespace).await?;
        let deadline = Deadline::for_release(release);
        let verdict = evaluate(&snapshot, threshold, &deadline, self.clock.now());

        match &verdict {
            ReadinessVerdict::Ready => {
                debug!(%role, kind = %self.kind, %name, %namespace, "workload ready");
            }
            ReadinessVerdict::Retryable(reason) => {
                info!(%role, kind = %self.kind, %name, %namespace, %reason, "workload not ready");
            }
            ReadinessVerdict::DeadlineExceeded(exceeded) => {
                warn!(
                    %role,
                    kind = %self.kind,
                    %name,
                    %namespace,
                    pending = %exceeded.pending,
                    deadline = %deadline.expires_at,
                    "workload exceeded progress deadline"
                );
            }
        }
        Ok(verdict)
    }

    async fn fetch_snapshot(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<WorkloadStatusSnapshot, ReadinessError> {
        let object = self
            .client
            .get(self.kind, name, namespace)
            .await
            .map_err(|error| ReadinessError::Fetch {
                kind: self.kind,
                name: name.to_string(),
                namespace: namespace.to_string(),
                error,
            })?;
        let snapshot = object.snapshot();
        debug!(kind = %self.kind, %name, %namespace, ?snapshot, "workload status");
        Ok(snapshot)
    }
}
