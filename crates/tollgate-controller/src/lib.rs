//! tollgate-controller — per-kind readiness checks for canary releases.
//!
//! Fetches the primary or canary workload of a release, projects its
//! status into a `WorkloadStatusSnapshot`, and hands it to the shared
//! evaluator in `tollgate-readiness`.
//!
//! # Architecture
//!
//! ```text
//! ReadinessController (one per WorkloadKind)
//!   ├── WorkloadClient::get(kind, name, namespace) → WorkloadObject
//!   │   ├── KubeWorkloadClient   (cluster API)
//!   │   └── StaticWorkloadClient (in-memory objects)
//!   ├── WorkloadObject::snapshot() → WorkloadStatusSnapshot
//!   ├── Clock::now()
//!   └── evaluate() → ReadinessVerdict → Result<(), ReadinessError>
//! ```
//!
//! Each call performs exactly one read and no retries; the outer
//! reconciler calls again on its next tick.

pub mod client;
pub mod controller;
pub mod error;
pub mod kube_client;
pub mod workload;

pub use client::{ClientError, StaticWorkloadClient, WorkloadClient};
pub use controller::{ReadinessController, Role};
pub use error::ReadinessError;
pub use kube_client::KubeWorkloadClient;
pub use workload::WorkloadObject;
