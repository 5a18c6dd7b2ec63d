//! Tollgate readiness evaluation — rollout convergence and deadlines.
//!
//! This crate decides whether a workload has finished converging to its
//! desired rollout state. The decision is a pure function of a status
//! snapshot, a ready threshold, a progress deadline and the current
//! instant, so it can be exercised without a cluster or a real clock.
//!
//! # Components
//!
//! - **`evaluator`** — `evaluate()` and the `Deadline` it checks against
//! - **`verdict`** — `ReadinessVerdict` and the reasons a workload is not ready
//! - **`clock`** — `Clock` trait with system and fixed sources

pub mod clock;
pub mod evaluator;
pub mod verdict;

pub use clock::{Clock, FixedClock, SystemClock};
pub use evaluator::{Deadline, evaluate};
pub use verdict::{DeadlineExceeded, NotReady, ReadinessVerdict, VerdictError};
