//! Workload objects and their projection into status snapshots.
//!
//! This is the only place that knows each kind's status field names.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use tollgate_state::{WorkloadKind, WorkloadStatusSnapshot, count};

/// A live workload object of one of the supported kinds.
///
/// Deserializes from cluster JSON; the `kind` field of each object picks
/// the variant and must be present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkloadObject {
    DaemonSet(DaemonSet),
    Deployment(Deployment),
    StatefulSet(StatefulSet),
}

impl WorkloadObject {
    pub fn kind(&self) -> WorkloadKind {
        match self {
            Self::DaemonSet(_) => WorkloadKind::DaemonSet,
            Self::Deployment(_) => WorkloadKind::Deployment,
            Self::StatefulSet(_) => WorkloadKind::StatefulSet,
        }
    }

    fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::DaemonSet(ds) => &ds.metadata,
            Self::Deployment(d) => &d.metadata,
            Self::StatefulSet(sts) => &sts.metadata,
        }
    }

    pub fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata().namespace.as_deref().unwrap_or_default()
    }

    /// Project the object's rollout counters.
    pub fn snapshot(&self) -> WorkloadStatusSnapshot {
        match self {
            Self::DaemonSet(ds) => daemon_set_snapshot(ds),
            Self::Deployment(d) => deployment_snapshot(d),
            Self::StatefulSet(sts) => stateful_set_snapshot(sts),
        }
    }
}

const KINDS: &[&str] = &["DaemonSet", "Deployment", "StatefulSet"];

impl<'de> Deserialize<'de> for WorkloadObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| D::Error::missing_field("kind"))?
            .to_string();
        let object = match kind.as_str() {
            "DaemonSet" => serde_json::from_value(value).map(Self::DaemonSet),
            "Deployment" => serde_json::from_value(value).map(Self::Deployment),
            "StatefulSet" => serde_json::from_value(value).map(Self::StatefulSet),
            other => return Err(D::Error::unknown_variant(other, KINDS)),
        };
        object.map_err(D::Error::custom)
    }
}

impl From<DaemonSet> for WorkloadObject {
    fn from(ds: DaemonSet) -> Self {
        Self::DaemonSet(ds)
    }
}

impl From<Deployment> for WorkloadObject {
    fn from(d: Deployment) -> Self {
        Self::Deployment(d)
    }
}

impl From<StatefulSet> for WorkloadObject {
    fn from(sts: StatefulSet) -> Self {
        Self::StatefulSet(sts)
    }
}

fn daemon_set_snapshot(ds: &DaemonSet) -> WorkloadStatusSnapshot {
    let status = ds.status.clone().unwrap_or_default();
    WorkloadStatusSnapshot {
        generation: ds.metadata.generation.unwrap_or(0),
        observed_generation: status.observed_generation.unwrap_or(0),
        desired_count: count(Some(status.desired_number_scheduled)),
        updated_count: count(status.updated_number_scheduled),
        available_count: count(status.number_available),
    }
}

/// Replica-set style kinds default to one replica when `spec.replicas`
/// is unset, as the API server does.
fn desired_replicas(replicas: Option<i32>) -> u32 {
    count(Some(replicas.unwrap_or(1)))
}

fn deployment_snapshot(d: &Deployment) -> WorkloadStatusSnapshot {
    let status = d.status.clone().unwrap_or_default();
    WorkloadStatusSnapshot {
        generation: d.metadata.generation.unwrap_or(0),
        observed_generation: status.observed_generation.unwrap_or(0),
        desired_count: desired_replicas(d.spec.as_ref().and_then(|s| s.replicas)),
        updated_count: count(status.updated_replicas),
        available_count: count(status.available_replicas),
    }
}

fn stateful_set_snapshot(sts: &StatefulSet) -> WorkloadStatusSnapshot {
    let status = sts.status.clone().unwrap_or_default();
    WorkloadStatusSnapshot {
        generation: sts.metadata.generation.unwrap_or(0),
        observed_generation: status.observed_generation.unwrap_or(0),
        desired_count: desired_replicas(sts.spec.as_ref().and_then(|s| s.replicas)),
        updated_count: count(status.updated_replicas),
        available_count: count(status.available_replicas),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn projects_daemon_set() {
        let obj = WorkloadObject::from(daemon_set("podinfo", "test", 10, 6, 5));
        assert_eq!(obj.kind(), WorkloadKind::DaemonSet);
        assert_eq!(obj.name(), "podinfo");
        assert_eq!(obj.namespace(), "test");
        assert_eq!(
            obj.snapshot(),
            WorkloadStatusSnapshot {
                generation: 1,
                observed_generation: 1,
                desired_count: 10,
                updated_count: 6,
                available_count: 5,
            }
        );
    }

    #[test]
    fn projects_deployment_from_spec_replicas() {
        let mut d = deployment("api", "prod", 4, 4, 3);
        if let Some(status) = d.status.as_mut() {
            // Surge replicas must not change the desired count.
            status.replicas = Some(5);
        }
        let snap = WorkloadObject::from(d).snapshot();
        assert_eq!(snap.desired_count, 4);
        assert_eq!(snap.updated_count, 4);
        assert_eq!(snap.available_count, 3);
    }

    #[test]
    fn deployment_without_replicas_defaults_to_one() {
        let mut d = deployment("api", "prod", 1, 0, 0);
        d.spec = None;
        assert_eq!(WorkloadObject::from(d).snapshot().desired_count, 1);
    }

    #[test]
    fn projects_stateful_set() {
        let snap = WorkloadObject::from(stateful_set("db", "prod", 3, 2, 2)).snapshot();
        assert_eq!(snap.desired_count, 3);
        assert_eq!(snap.updated_count, 2);
        assert_eq!(snap.available_count, 2);
    }

    #[test]
    fn missing_status_reads_as_stale() {
        let mut ds = daemon_set("podinfo", "test", 1, 1, 1);
        ds.status = None;
        let snap = WorkloadObject::from(ds).snapshot();
        assert!(snap.is_stale());
        assert_eq!(snap.observed_generation, 0);
    }

    #[test]
    fn negative_counts_clamp() {
        let mut ds = daemon_set("podinfo", "test", -1, 0, 0);
        if let Some(status) = ds.status.as_mut() {
            status.number_available = Some(-4);
        }
        let snap = WorkloadObject::from(ds).snapshot();
        assert_eq!(snap.desired_count, 0);
        assert_eq!(snap.available_count, 0);
    }

    #[test]
    fn deserializes_by_kind_field() {
        let json = r#"[
            {"apiVersion": "apps/v1", "kind": "StatefulSet",
             "metadata": {"name": "db", "namespace": "prod", "generation": 2},
             "spec": {"replicas": 3, "selector": {}, "serviceName": "db", "template": {}},
             "status": {"observedGeneration": 2, "replicas": 3, "updatedReplicas": 3, "availableReplicas": 3}},
            {"apiVersion": "apps/v1", "kind": "DaemonSet",
             "metadata": {"name": "agent", "namespace": "kube-system", "generation": 1},
             "status": {"observedGeneration": 1, "currentNumberScheduled": 2, "desiredNumberScheduled": 2,
                        "numberMisscheduled": 0, "numberReady": 2, "numberAvailable": 2, "updatedNumberScheduled": 2}}
        ]"#;
        let objects: Vec<WorkloadObject> = serde_json::from_str(json).unwrap();
        assert_eq!(objects[0].kind(), WorkloadKind::StatefulSet);
        assert_eq!(objects[1].kind(), WorkloadKind::DaemonSet);
        assert_eq!(objects[1].snapshot().desired_count, 2);
    }

    #[test]
    fn rejects_object_without_kind() {
        let json = r#"[
            {"metadata": {"name": "db", "namespace": "prod", "generation": 1},
             "spec": {"replicas": 3, "selector": {}, "serviceName": "db", "template": {}},
             "status": {"observedGeneration": 1, "replicas": 3}}
        ]"#;
        let err = serde_json::from_str::<Vec<WorkloadObject>>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `kind`"), "{err}");
    }

    #[test]
    fn rejects_unsupported_kind() {
        let json = r#"{"apiVersion": "apps/v1", "kind": "ReplicaSet", "metadata": {"name": "rs"}}"#;
        let err = serde_json::from_str::<WorkloadObject>(json).unwrap_err();
        assert!(err.to_string().contains("unknown variant `ReplicaSet`"), "{err}");
    }

    #[test]
    fn round_trips_through_json() {
        let obj = WorkloadObject::from(stateful_set("db", "prod", 3, 3, 2));
        let json = serde_json::to_string(&obj).unwrap();
        let back: WorkloadObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), WorkloadKind::StatefulSet);
        assert_eq!(back.snapshot(), obj.snapshot());
    }
}
