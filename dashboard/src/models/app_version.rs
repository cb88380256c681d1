//! Application version model

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::store::model::ModelStore;
use crate::store::observe::{FetchState, Listener, Observable, Subscription};
use crate::store::record::{FieldValue, Record};
use crate::store::resource::RemoteResource;

/// A configuration snapshot of an application, keyed by its version
/// timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersion {
    /// Version timestamp, e.g. "2015-09-30T09:09:17.614Z"
    pub version: String,

    /// Application ID
    #[serde(default)]
    pub id: String,

    /// Command the app runs
    #[serde(default)]
    pub cmd: Option<String>,

    /// Requested instance count
    #[serde(default)]
    pub instances: u32,

    /// Requested CPU share per instance
    #[serde(default)]
    pub cpus: f64,

    /// Requested memory per instance, in MiB
    #[serde(default)]
    pub mem: f64,
}

impl AppVersion {
    /// Parse the version timestamp into a comparable instant
    pub fn parsed_version(&self) -> Result<DateTime<Utc>, DashError> {
        let parsed = DateTime::parse_from_rfc3339(&self.version)?;
        Ok(parsed.with_timezone(&Utc))
    }
}

impl Record for AppVersion {
    fn id(&self) -> &str {
        &self.version
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "version" => match self.parsed_version() {
                Ok(instant) => Some(FieldValue::Time(instant)),
                Err(_) => Some(FieldValue::Str(self.version.clone())),
            },
            "instances" => Some(FieldValue::Int(i64::from(self.instances))),
            _ => None,
        }
    }
}

/// Store for one app version, fetched on demand
pub struct AppVersionStore {
    app_id: String,
    store: ModelStore<AppVersion>,
}

impl AppVersionStore {
    /// Store bound to `/v2/apps/{appId}/versions/{version}`
    pub fn new(app_id: &str, version: &str) -> Self {
        let url = format!(
            "/v2/apps/{}/versions/{}",
            app_id.trim_start_matches('/'),
            version
        );
        Self {
            app_id: app_id.to_string(),
            store: ModelStore::new(url),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn store(&self) -> &ModelStore<AppVersion> {
        &self.store
    }
}

#[async_trait]
impl RemoteResource for AppVersionStore {
    fn name(&self) -> &str {
        "app-version"
    }

    async fn fetch(&self, client: &HttpClient) -> Result<(), DashError> {
        let result = client.get_app_version(self.store.url()).await;
        self.store.sync_from(result)
    }

    fn fetch_state(&self) -> FetchState {
        self.store.fetch_state()
    }
}

impl Observable for AppVersionStore {
    fn subscribe(&self, listener: Listener) -> Subscription {
        self.store.subscribe(listener)
    }

    fn subscriber_count(&self) -> usize {
        self.store.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(raw: &str) -> AppVersion {
        AppVersion {
            version: raw.to_string(),
            id: "/webapp".to_string(),
            cmd: None,
            instances: 2,
            cpus: 0.5,
            mem: 128.0,
        }
    }

    #[test]
    fn test_parsed_version() {
        let parsed = version("2015-09-30T09:09:17.614Z").parsed_version().unwrap();
        assert_eq!(parsed.timestamp(), 1443604157);
    }

    #[test]
    fn test_parsed_version_rejects_garbage() {
        assert!(version("not-a-timestamp").parsed_version().is_err());
    }

    #[test]
    fn test_identifier_is_the_version() {
        let record = version("2015-09-30T09:09:17.614Z");
        assert_eq!(record.id(), "2015-09-30T09:09:17.614Z");
    }

    #[test]
    fn test_store_url() {
        let store = AppVersionStore::new("/webapp", "2015-09-30T09:09:17.614Z");
        assert_eq!(
            store.store().url(),
            "/v2/apps/webapp/versions/2015-09-30T09:09:17.614Z"
        );
    }
}
