//! App versions API client

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::models::app_version::AppVersion;

impl HttpClient {
    /// Get one app configuration snapshot by version
    pub async fn get_app_version(&self, path: &str) -> Result<AppVersion, DashError> {
        self.get_json(path).await
    }
}
