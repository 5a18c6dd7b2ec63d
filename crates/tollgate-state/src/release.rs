//! Release descriptor — the canary release a readiness check runs for.
//!
//! Parsed from TOML:
//!
//! ```toml
//! name = "podinfo"
//! namespace = "test"
//! progress_deadline_seconds = 60
//!
//! [target_ref]
//! kind = "DaemonSet"
//! name = "podinfo"
//!
//! [analysis]
//! primary_ready_threshold = 50
//!
//! [status]
//! last_transition_time = "2026-10-18T12:00:00Z"
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::types::{ReadyThreshold, WorkloadKind};

/// Progress deadline applied when a release does not set one.
pub const DEFAULT_PROGRESS_DEADLINE_SECONDS: u64 = 600;

/// Suffix appended to the target name to address the primary workload.
pub const PRIMARY_SUFFIX: &str = "-primary";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseDescriptor {
    pub name: String,
    pub namespace: String,
    /// Seconds a rollout phase may stay non-ready before it is failed.
    pub progress_deadline_seconds: Option<u64>,
    pub target_ref: TargetRef,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub status: ReleaseStatus,
}

/// Workload the release promotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetRef {
    pub kind: WorkloadKind,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Share of primary replicas that must be available for the primary
    /// to count as ready.
    pub primary_ready_threshold: Option<ReadyThreshold>,
}

/// Status fields written by the outer reconciler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseStatus {
    /// When the current rollout phase began.
    pub last_transition_time: DateTime<Utc>,
}

impl ReleaseDescriptor {
    pub fn from_file(path: &Path) -> StateResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let release = Self::from_toml_str(&content)?;
        debug!(?path, release = %release.name, "release loaded");
        Ok(release)
    }

    pub fn from_toml_str(content: &str) -> StateResult<Self> {
        let release: ReleaseDescriptor = toml::from_str(content)?;
        release.validate()?;
        Ok(release)
    }

    /// Check the fields serde cannot enforce.
    pub fn validate(&self) -> StateResult<()> {
        if self.name.is_empty() {
            return Err(StateError::Invalid("release name is empty".to_string()));
        }
        if self.namespace.is_empty() {
            return Err(StateError::Invalid(format!(
                "release {} has no namespace",
                self.name
            )));
        }
        if self.target_ref.name.is_empty() {
            return Err(StateError::Invalid(format!(
                "release {}.{} has no target name",
                self.name, self.namespace
            )));
        }
        Ok(())
    }

    /// Name of the primary workload (`{target}-primary`).
    pub fn primary_name(&self) -> String {
        format!("{}{PRIMARY_SUFFIX}", self.target_ref.name)
    }

    /// Name of the canary workload, which is the target itself.
    pub fn canary_name(&self) -> &str {
        &self.target_ref.name
    }

    pub fn kind(&self) -> WorkloadKind {
        self.target_ref.kind
    }

    pub fn progress_deadline_seconds(&self) -> u64 {
        self.progress_deadline_seconds
            .unwrap_or(DEFAULT_PROGRESS_DEADLINE_SECONDS)
    }

    pub fn primary_ready_threshold(&self) -> ReadyThreshold {
        self.analysis.primary_ready_threshold.unwrap_or_default()
    }

    pub fn last_transition_time(&self) -> DateTime<Utc> {
        self.status.last_transition_time
    }
}
