//! tollgate-state — release and workload data for Tollgate.
//!
//! Holds the read-only inputs of a readiness check: the release
//! descriptor owned by the outer reconciler, the supported workload
//! kinds, and the kind-agnostic status snapshot that every workload is
//! projected into before evaluation.
//!
//! # Architecture
//!
//! Release descriptors are parsed from TOML and validated once at load
//! time. Snapshots are plain values built fresh on every fetch and never
//! shared between reconciliation ticks.

pub mod error;
pub mod release;
pub mod types;

pub use error::{StateError, StateResult};
pub use release::{AnalysisConfig, ReleaseDescriptor, ReleaseStatus, TargetRef};
pub use types::*;
