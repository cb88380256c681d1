//! Settings file management

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DashError;
use crate::logs::LogLevel;

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Application whose tasks the dashboard observes
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Enable the local HTTP server
    #[serde(default = "default_true")]
    pub enable_server: bool,

    /// Enable the polling worker
    #[serde(default = "default_true")]
    pub enable_poller: bool,

    /// Polling interval in seconds
    #[serde(default = "default_polling_interval")]
    pub polling_interval_secs: u64,

    /// Local server configuration
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_true() -> bool {
    true
}

fn default_app_id() -> String {
    "webapp".to_string()
}

fn default_polling_interval() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            backend: BackendSettings::default(),
            app_id: default_app_id(),
            enable_server: true,
            enable_poller: true,
            polling_interval_secs: default_polling_interval(),
            server: ServerSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when no path
    /// is given
    pub async fn load(path: Option<&Path>) -> Result<Self, DashError> {
        match path {
            Some(path) => {
                let raw = tokio::fs::read(path).await?;
                let settings = serde_json::from_slice(&raw)?;
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }

    /// Validate settings deserialization alone cannot check
    pub fn validate(&self) -> Result<(), DashError> {
        url::Url::parse(&self.backend.base_url)
            .map_err(|e| DashError::ConfigError(format!("invalid backend base_url: {}", e)))?;
        Ok(())
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend REST API
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

/// Local HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    5050
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}
