//! Tasks API client

use serde::Deserialize;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::models::task::Task;

/// Task list response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

impl HttpClient {
    /// List an application's tasks; returns the records and the body digest
    pub async fn list_tasks(&self, path: &str) -> Result<(Vec<Task>, String), DashError> {
        let (response, digest): (TaskListResponse, String) =
            self.get_json_with_digest(path).await?;
        Ok((response.tasks, digest))
    }
}
