//! Deployments API client

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::models::deployment::Deployment;

impl HttpClient {
    /// List deployments in flight; returns the records and the body digest
    pub async fn list_deployments(
        &self,
        path: &str,
    ) -> Result<(Vec<Deployment>, String), DashError> {
        self.get_json_with_digest(path).await
    }
}
