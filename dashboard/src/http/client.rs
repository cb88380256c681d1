//! HTTP client implementation

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::errors::DashError;
use crate::utils::sha256_hex;

/// HTTP client for the backend REST API
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str) -> Result<Self, DashError> {
        url::Url::parse(base_url)
            .map_err(|e| DashError::ConfigError(format!("invalid base url {}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request, deserializing the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashError> {
        let (value, _digest) = self.get_json_with_digest(path).await?;
        Ok(value)
    }

    /// Make a GET request, returning the deserialized response together with
    /// the SHA-256 digest of the raw body
    pub async fn get_json_with_digest<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(T, String), DashError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP GET failed: {} - {}", status, body);
            return Err(DashError::UnexpectedStatus { status, body });
        }

        let bytes = response.bytes().await?;
        let digest = sha256_hex(&bytes);
        let value = serde_json::from_slice(&bytes)?;
        Ok((value, digest))
    }
}
