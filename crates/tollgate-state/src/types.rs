//! Domain types shared by the evaluator and the kind controllers.
//!
//! `WorkloadStatusSnapshot` is the only shape the readiness evaluator
//! understands; each supported `WorkloadKind` is projected into it.

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};

// ── Workload kind ─────────────────────────────────────────────────

/// Workload kinds a release can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadKind {
    /// Rolling-update daemon workload, one pod per eligible node.
    DaemonSet,
    /// Replica-set style workload.
    Deployment,
    /// Ordered stateful workload.
    StatefulSet,
}

impl WorkloadKind {
    /// Lowercase name used in status messages (`daemonset`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DaemonSet => "daemonset",
            Self::Deployment => "deployment",
            Self::StatefulSet => "statefulset",
        }
    }
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Status snapshot ───────────────────────────────────────────────

/// Kind-agnostic projection of a workload's rollout counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkloadStatusSnapshot {
    /// Generation of the most recent spec (`metadata.generation`).
    pub generation: i64,
    /// Generation the status was last computed for.
    pub observed_generation: i64,
    /// Replicas or scheduled pods the workload should run.
    pub desired_count: u32,
    /// Replicas already running the current spec.
    pub updated_count: u32,
    /// Replicas available to serve.
    pub available_count: u32,
}

impl WorkloadStatusSnapshot {
    /// Whether the status lags behind the latest spec change.
    ///
    /// A stale snapshot must not be used to draw readiness conclusions.
    pub fn is_stale(&self) -> bool {
        self.generation > self.observed_generation
    }
}

/// Clamp a cluster-reported counter into a non-negative count.
pub fn count(value: Option<i32>) -> u32 {
    value.map_or(0, |v| u32::try_from(v).unwrap_or(0))
}

// ── Ready threshold ───────────────────────────────────────────────

/// Percentage of desired replicas that must be available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ReadyThreshold(u32);

impl ReadyThreshold {
    /// Every desired replica must be available. Canaries always use this.
    pub const FULL: Self = Self(100);

    /// Build a threshold, rejecting values above 100.
    pub fn new(percent: u32) -> StateResult<Self> {
        if percent > 100 {
            return Err(StateError::InvalidThreshold(percent));
        }
        Ok(Self(percent))
    }

    pub fn percent(&self) -> u32 {
        self.0
    }

    /// Replicas that must be available: `floor(desired * percent / 100)`.
    pub fn required_replicas(&self, desired: u32) -> u32 {
        // percent <= 100, so the result never exceeds `desired`.
        (u64::from(desired) * u64::from(self.0) / 100) as u32
    }
}

impl Default for ReadyThreshold {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u32> for ReadyThreshold {
    type Error = StateError;

    fn try_from(percent: u32) -> StateResult<Self> {
        Self::new(percent)
    }
}

impl From<ReadyThreshold> for u32 {
    fn from(threshold: ReadyThreshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for ReadyThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
