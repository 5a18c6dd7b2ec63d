use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use tollgate_controller::{
    KubeWorkloadClient, ReadinessController, ReadinessError, StaticWorkloadClient, WorkloadClient,
};
use tollgate_readiness::ReadinessVerdict;
use tollgate_state::{ReleaseDescriptor, WorkloadKind};

use crate::{Format, RoleArg};

const EXIT_NOT_READY_FATAL: u8 = 1;
const EXIT_NOT_READY_RETRYABLE: u8 = 2;

/// Result of one readiness check, as printed.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub release: String,
    pub namespace: String,
    pub role: &'static str,
    pub kind: WorkloadKind,
    pub workload: String,
    pub ready: bool,
    pub retryable: bool,
    /// Absent when the workload could not be fetched.
    pub verdict: Option<ReadinessVerdict>,
    pub message: Option<String>,
}

impl CheckReport {
    fn new(release: &ReleaseDescriptor, role: RoleArg, result: Result<(), ReadinessError>) -> Self {
        let (role_name, workload) = match role {
            RoleArg::Primary => ("primary", release.primary_name()),
            RoleArg::Canary => ("canary", release.canary_name().to_string()),
        };
        let (ready, retryable, verdict, message) = match result {
            Ok(()) => (true, true, Some(ReadinessVerdict::Ready), None),
            Err(e) => (
                false,
                e.is_retryable(),
                e.verdict().cloned().map(ReadinessVerdict::from),
                Some(e.to_string()),
            ),
        };
        Self {
            release: release.name.clone(),
            namespace: release.namespace.clone(),
            role: role_name,
            kind: release.kind(),
            workload,
            ready,
            retryable,
            verdict,
            message,
        }
    }

    fn exit_status(&self) -> u8 {
        if self.ready {
            0
        } else if self.retryable {
            EXIT_NOT_READY_RETRYABLE
        } else {
            EXIT_NOT_READY_FATAL
        }
    }

    fn to_text(&self) -> String {
        match &self.message {
            None => format!(
                "✓ {} {} {}.{} is ready",
                self.role, self.kind, self.workload, self.namespace
            ),
            Some(message) if self.retryable => format!("… {message}"),
            Some(message) => format!("✗ {message}"),
        }
    }
}

pub async fn check(
    release_path: &Path,
    role: RoleArg,
    objects: Option<&Path>,
    format: Format,
) -> anyhow::Result<ExitCode> {
    let release = ReleaseDescriptor::from_file(release_path)?;

    let client: Arc<dyn WorkloadClient> = match objects {
        Some(path) => Arc::new(StaticWorkloadClient::from_json_file(path)?),
        None => Arc::new(KubeWorkloadClient::try_default().await?),
    };
    let report = run(&release, role, client).await;
    info!(
        release = %report.release,
        role = report.role,
        ready = report.ready,
        retryable = report.retryable,
        "readiness check finished"
    );

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => println!("{}", report.to_text()),
    }

    Ok(ExitCode::from(report.exit_status()))
}

async fn run(
    release: &ReleaseDescriptor,
    role: RoleArg,
    client: Arc<dyn WorkloadClient>,
) -> CheckReport {
    let controller = ReadinessController::for_release(release, client);
    let result = match role {
        RoleArg::Primary => controller.is_primary_ready(release).await,
        RoleArg::Canary => controller.is_canary_ready(release).await,
    };
    CheckReport::new(release, role, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE: &str = r#"
name = "podinfo"
namespace = "test"
progress_deadline_seconds = 60

[target_ref]
kind = "Deployment"
name = "podinfo"

[status]
last_transition_time = "2000-01-01T00:00:00Z"
"#;

    const OBJECTS: &str = r#"[
        {"apiVersion": "apps/v1", "kind": "Deployment",
         "metadata": {"name": "podinfo-primary", "namespace": "test", "generation": 1},
         "spec": {"replicas": 2, "selector": {}, "template": {}},
         "status": {"observedGeneration": 1, "replicas": 2, "updatedReplicas": 2, "availableReplicas": 2}},
        {"apiVersion": "apps/v1", "kind": "Deployment",
         "metadata": {"name": "podinfo", "namespace": "test", "generation": 1},
         "spec": {"replicas": 2, "selector": {}, "template": {}},
         "status": {"observedGeneration": 1, "replicas": 2, "updatedReplicas": 1, "availableReplicas": 1}}
    ]"#;

    fn setup() -> (tempfile::TempDir, ReleaseDescriptor, Arc<dyn WorkloadClient>) {
        let dir = tempfile::tempdir().unwrap();
        let objects = dir.path().join("objects.json");
        std::fs::write(&objects, OBJECTS).unwrap();
        let client = StaticWorkloadClient::from_json_file(&objects).unwrap();
        let release = ReleaseDescriptor::from_toml_str(RELEASE).unwrap();
        (dir, release, Arc::new(client))
    }

    #[tokio::test]
    async fn ready_primary_exits_zero() {
        let (_dir, release, client) = setup();
        let report = run(&release, RoleArg::Primary, client).await;
        assert!(report.ready);
        assert_eq!(report.workload, "podinfo-primary");
        assert_eq!(report.exit_status(), 0);
        assert!(report.to_text().contains("is ready"));
    }

    #[tokio::test]
    async fn stalled_canary_is_fatal() {
        // The transition time is long past, so the 60s deadline has expired.
        let (_dir, release, client) = setup();
        let report = run(&release, RoleArg::Canary, client).await;
        assert!(!report.ready);
        assert!(!report.retryable);
        assert_eq!(report.exit_status(), EXIT_NOT_READY_FATAL);
        assert!(matches!(
            report.verdict,
            Some(ReadinessVerdict::DeadlineExceeded(_))
        ));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "Deployment");
        assert_eq!(json["verdict"]["verdict"], "deadline_exceeded");
    }

    #[tokio::test]
    async fn missing_workload_is_retryable() {
        let (_dir, mut release, client) = setup();
        release.target_ref.name = "absent".to_string();
        let report = run(&release, RoleArg::Canary, client).await;
        assert!(report.retryable);
        assert!(report.verdict.is_none());
        assert_eq!(report.exit_status(), EXIT_NOT_READY_RETRYABLE);
    }
}
