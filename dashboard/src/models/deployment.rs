//! Deployment model and collection

use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::store::collection::Collection;
use crate::store::observe::{FetchState, Listener, Observable, Subscription};
use crate::store::record::{Comparator, FieldValue, Record};
use crate::store::resource::RemoteResource;

/// A deployment in flight on the cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Unique deployment ID
    pub id: String,

    /// Applications the deployment touches
    #[serde(default)]
    pub affected_apps: Vec<String>,

    /// Current step of the deployment plan
    #[serde(default)]
    pub current_step: u32,

    /// Total steps of the deployment plan
    #[serde(default)]
    pub total_steps: u32,

    /// App version (timestamp string) being deployed
    #[serde(default)]
    pub version: String,
}

impl Record for Deployment {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Str(self.id.clone())),
            "version" => Some(FieldValue::Str(self.version.clone())),
            "current_step" => Some(FieldValue::Int(i64::from(self.current_step))),
            "total_steps" => Some(FieldValue::Int(i64::from(self.total_steps))),
            _ => None,
        }
    }
}

/// Cluster-wide deployments, most recent first
pub struct DeploymentCollection {
    collection: Collection<Deployment>,
    last_digest: RwLock<Option<String>>,
}

impl DeploymentCollection {
    /// Collection bound to `/v2/deployments`, ordered descending by id
    pub fn new() -> Self {
        Self {
            collection: Collection::with_comparator(
                "/v2/deployments",
                Comparator::by_field("-id"),
            ),
            last_digest: RwLock::new(None),
        }
    }

    pub fn collection(&self) -> &Collection<Deployment> {
        &self.collection
    }

    fn digest_unchanged(&self, digest: &str) -> bool {
        self.collection.fetch_state() == FetchState::Success
            && self
                .last_digest
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .as_deref()
                == Some(digest)
    }
}

impl Default for DeploymentCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteResource for DeploymentCollection {
    fn name(&self) -> &str {
        "deployments"
    }

    async fn fetch(&self, client: &HttpClient) -> Result<(), DashError> {
        match client.list_deployments(self.collection.url()).await {
            Ok((deployments, digest)) => {
                if self.digest_unchanged(&digest) {
                    debug!("Deployment list unchanged, skipping reset");
                    return Ok(());
                }
                *self.last_digest.write().unwrap_or_else(|e| e.into_inner()) = Some(digest);
                self.collection.sync_from(Ok(deployments))
            }
            Err(e) => self.collection.sync_from(Err(e)),
        }
    }

    fn fetch_state(&self) -> FetchState {
        self.collection.fetch_state()
    }
}

impl Observable for DeploymentCollection {
    fn subscribe(&self, listener: Listener) -> Subscription {
        self.collection.subscribe(listener)
    }

    fn subscriber_count(&self) -> usize {
        self.collection.subscriber_count()
    }
}
