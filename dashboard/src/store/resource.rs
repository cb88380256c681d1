//! Uniform fetch surface over typed stores

use async_trait::async_trait;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::store::observe::FetchState;

/// A REST-backed store the refresher can fetch
#[async_trait]
pub trait RemoteResource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Fetch the backing resource and settle the store
    async fn fetch(&self, client: &HttpClient) -> Result<(), DashError>;

    /// Status of the most recent settled fetch
    fn fetch_state(&self) -> FetchState;
}
