//! Task model and collection

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::store::collection::Collection;
use crate::store::observe::{FetchState, Listener, Observable, Subscription};
use crate::store::record::{Comparator, FieldValue, Record};
use crate::store::resource::RemoteResource;

/// Derived health classification of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskHealth {
    Healthy,
    Unhealthy,
    Unknown,
}

impl TaskHealth {
    /// Display label for the health row
    pub fn label(&self) -> &'static str {
        match self {
            TaskHealth::Healthy => "Healthy",
            TaskHealth::Unhealthy => "Unhealthy",
            TaskHealth::Unknown => "Unknown",
        }
    }
}

/// One health check result reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    /// Whether the last check passed
    pub alive: bool,

    /// Failures since the last success
    #[serde(default)]
    pub consecutive_failures: u32,

    #[serde(default)]
    pub first_success: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_success: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_failure: Option<DateTime<Utc>>,

    #[serde(default)]
    pub task_id: Option<String>,
}

/// A staged or running task of an application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: String,

    /// Application this task belongs to
    #[serde(default)]
    pub app_id: String,

    /// Host the task runs on
    #[serde(default)]
    pub host: String,

    /// Ports allocated to the task
    #[serde(default)]
    pub ports: Vec<u16>,

    /// Scheduler status, e.g. "TASK_RUNNING"
    #[serde(default)]
    pub status: String,

    /// When the task was staged
    #[serde(default)]
    pub staged_at: Option<DateTime<Utc>>,

    /// When the task started
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// App version (timestamp string) the task was launched from
    #[serde(default)]
    pub version: String,

    /// Health check results, present when the app defines health checks
    #[serde(default)]
    pub health_check_results: Vec<HealthCheckResult>,
}

impl Task {
    /// Classify health from the reported check results
    ///
    /// No results means Unknown; any dead check means Unhealthy.
    pub fn health(&self) -> TaskHealth {
        if self.health_check_results.is_empty() {
            return TaskHealth::Unknown;
        }
        if self.health_check_results.iter().any(|r| !r.alive) {
            TaskHealth::Unhealthy
        } else {
            TaskHealth::Healthy
        }
    }

    /// Placeholder for a task id the dashboard no longer holds data for
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            app_id: String::new(),
            host: String::new(),
            ports: Vec::new(),
            status: String::new(),
            staged_at: None,
            started_at: None,
            version: String::new(),
            health_check_results: Vec::new(),
        }
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Str(self.id.clone())),
            "host" => Some(FieldValue::Str(self.host.clone())),
            "status" => Some(FieldValue::Str(self.status.clone())),
            "staged_at" => self.staged_at.map(FieldValue::Time),
            "started_at" => self.started_at.map(FieldValue::Time),
            "version" => Some(FieldValue::Str(self.version.clone())),
            _ => None,
        }
    }
}

/// Tasks of one application, fetched from the tasks endpoint
pub struct TaskCollection {
    collection: Collection<Task>,
    last_digest: RwLock<Option<String>>,
}

impl TaskCollection {
    /// Collection bound to `/v2/apps/{appId}/tasks`, ordered by task id
    pub fn new(app_id: &str) -> Self {
        let url = format!("/v2/apps/{}/tasks", app_id.trim_start_matches('/'));
        Self {
            collection: Collection::with_comparator(url, Comparator::by_field("id")),
            last_digest: RwLock::new(None),
        }
    }

    pub fn collection(&self) -> &Collection<Task> {
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

#[async_trait]
impl RemoteResource for TaskCollection {
    fn name(&self) -> &str {
        "tasks"
    }

    async fn fetch(&self, client: &HttpClient) -> Result<(), DashError> {
        match client.list_tasks(self.collection.url()).await {
            Ok((tasks, digest)) => {
                if self.digest_unchanged(&digest) {
                    debug!("Task list unchanged, skipping reset");
                    return Ok(());
                }
                *self.last_digest.write().unwrap_or_else(|e| e.into_inner()) = Some(digest);
                self.collection.sync_from(Ok(tasks))
            }
            Err(e) => self.collection.sync_from(Err(e)),
        }
    }

    fn fetch_state(&self) -> FetchState {
        self.collection.fetch_state()
    }
}

impl Observable for TaskCollection {
    fn subscribe(&self, listener: Listener) -> Subscription {
        self.collection.subscribe(listener)
    }

    fn subscriber_count(&self) -> usize {
        self.collection.subscriber_count()
    }
}
