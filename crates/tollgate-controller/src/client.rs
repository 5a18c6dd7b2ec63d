//! Read-only workload client.
//!
//! The controllers only ever need one operation from the cluster API:
//! fetch a workload by kind, name and namespace.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use tollgate_state::WorkloadKind;

use crate::workload::WorkloadObject;

/// Errors returned by a `WorkloadClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{kind} {name}.{namespace} not found")]
    NotFound {
        kind: WorkloadKind,
        name: String,
        namespace: String,
    },

    #[error("api error: {0}")]
    Api(String),

    #[error("failed to load workload objects: {0}")]
    Load(String),
}

/// Fetches live workload objects.
#[async_trait]
pub trait WorkloadClient: Send + Sync {
    async fn get(
        &self,
        kind: WorkloadKind,
        name: &str,
        namespace: &str,
    ) -> Result<WorkloadObject, ClientError>;
}

type ObjectKey = (WorkloadKind, String, String);

/// In-memory client serving a fixed set of objects.
///
/// Used for offline evaluation and tests. Objects can be replaced between
/// calls to simulate status changes.
#[derive(Clone, Default)]
pub struct StaticWorkloadClient {
    objects: Arc<RwLock<HashMap<ObjectKey, WorkloadObject>>>,
}

impl StaticWorkloadClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client from objects known up front.
    pub fn with_objects(objects: impl IntoIterator<Item = WorkloadObject>) -> Self {
        let map = objects
            .into_iter()
            .map(|obj| (key_of(&obj), obj))
            .collect::<HashMap<_, _>>();
        Self {
            objects: Arc::new(RwLock::new(map)),
        }
    }

    /// Load a JSON array of cluster objects.
    pub fn from_json_file(path: &Path) -> Result<Self, ClientError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ClientError::Load(e.to_string()))?;
        let objects: Vec<WorkloadObject> =
            serde_json::from_str(&content).map_err(|e| ClientError::Load(e.to_string()))?;
        debug!(?path, count = objects.len(), "workload objects loaded");
        Ok(Self::with_objects(objects))
    }

    /// Insert or replace an object, keyed by its kind, name and namespace.
    pub async fn insert(&self, object: impl Into<WorkloadObject>) {
        let object = object.into();
        self.objects.write().await.insert(key_of(&object), object);
    }

    /// Remove an object. Returns true if it existed.
    pub async fn remove(&self, kind: WorkloadKind, name: &str, namespace: &str) -> bool {
        self.objects
            .write()
            .await
            .remove(&(kind, name.to_string(), namespace.to_string()))
            .is_some()
    }
}

fn key_of(object: &WorkloadObject) -> ObjectKey {
    (
        object.kind(),
        object.name().to_string(),
        object.namespace().to_string(),
    )
}

#[async_trait]
impl WorkloadClient for StaticWorkloadClient {
    async fn get(
        &self,
        kind: WorkloadKind,
        name: &str,
        namespace: &str,
    ) -> Result<WorkloadObject, ClientError> {
        let objects = self.objects.read().await;
        objects
            .get(&(kind, name.to_string(), namespace.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                kind,
                name: name.to_string(),
                namespace: namespace.to_string(),
            })
    }
}
