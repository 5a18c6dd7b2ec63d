//! Cluster-backed workload client.

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use tracing::debug;

use tollgate_state::WorkloadKind;

use crate::client::{ClientError, WorkloadClient};
use crate::workload::WorkloadObject;

/// Reads workloads from the cluster API server.
#[derive(Clone)]
pub struct KubeWorkloadClient {
    client: Client,
}

impl KubeWorkloadClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the local kubeconfig or the in-cluster service account.
    pub async fn try_default() -> Result<Self, ClientError> {
        let client = Client::try_default()
            .await
            .map_err(|e| ClientError::Api(e.to_string()))?;
        Ok(Self::new(client))
    }

    async fn fetch<K>(
        &self,
        kind: WorkloadKind,
        name: &str,
        namespace: &str,
    ) -> Result<K, ClientError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + std::fmt::Debug,
        <K as Resource>::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        debug!(%kind, %name, %namespace, "fetching workload");
        api.get_opt(name)
            .await
            .map_err(|e| ClientError::Api(e.to_string()))?
            .ok_or_else(|| ClientError::NotFound {
                kind,
                name: name.to_string(),
                namespace: namespace.to_string(),
            })
    }
}

#[async_trait]
impl WorkloadClient for KubeWorkloadClient {
    async fn get(
        &self,
        kind: WorkloadKind,
        name: &str,
        namespace: &str,
    ) -> Result<WorkloadObject, ClientError> {
        let object = match kind {
            WorkloadKind::DaemonSet => self
                .fetch::<DaemonSet>(kind, name, namespace)
                .await?
                .into(),
            WorkloadKind::Deployment => self
                .fetch::<Deployment>(kind, name, namespace)
                .await?
                .into(),
            WorkloadKind::StatefulSet => self
                .fetch::<StatefulSet>(kind, name, namespace)
                .await?
                .into(),
        };
        Ok(object)
    }
}
