//! Shared fixtures for controller integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tollgate_controller::{ReadinessController, StaticWorkloadClient, WorkloadObject};
use tollgate_readiness::FixedClock;
use tollgate_state::{ReleaseDescriptor, WorkloadKind};

pub const RELEASE: &str = r#"
name = "podinfo"
namespace = "test"
progress_deadline_seconds = 60

[target_ref]
kind = "DaemonSet"
name = "podinfo"

[analysis]
primary_ready_threshold = 75

[status]
last_transition_time = "2026-10-18T12:00:00Z"
"#;

pub fn release() -> ReleaseDescriptor {
    ReleaseDescriptor::from_toml_str(RELEASE).unwrap()
}

pub fn transition_time() -> DateTime<Utc> {
    release().last_transition_time()
}

/// A daemon set whose status has caught up with generation 1.
pub fn daemon_set(name: &str, desired: i32, updated: i32, available: i32) -> WorkloadObject {
    WorkloadObject::from(DaemonSet {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("test".to_string()),
            generation: Some(1),
            ..Default::default()
        },
        status: Some(DaemonSetStatus {
            observed_generation: Some(1),
            desired_number_scheduled: desired,
            current_number_scheduled: desired,
            updated_number_scheduled: Some(updated),
            number_available: Some(available),
            number_ready: available,
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Controller over `objects` with the clock `offset_secs` past the
/// release's last transition.
pub fn controller(
    objects: Vec<WorkloadObject>,
    offset_secs: i64,
) -> (ReadinessController, StaticWorkloadClient, Arc<FixedClock>) {
    let client = StaticWorkloadClient::with_objects(objects);
    let clock = Arc::new(FixedClock::new(
        transition_time() + TimeDelta::seconds(offset_secs),
    ));
    let ctrl = ReadinessController::new(WorkloadKind::DaemonSet, Arc::new(client.clone()))
        .with_clock(clock.clone());
    (ctrl, client, clock)
}
