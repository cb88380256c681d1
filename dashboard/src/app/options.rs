//! Application configuration options

use std::time::Duration;

use crate::workers::poller;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub backend_base_url: String,

    /// Application whose tasks are observed
    pub app_id: String,

    /// Enable the local HTTP server
    pub enable_server: bool,

    /// Enable the polling worker
    pub enable_poller: bool,

    /// Server configuration
    pub server: ServerOptions,

    /// Poller worker options
    pub poller: poller::Options,

    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8080".to_string(),
            app_id: "webapp".to_string(),
            enable_server: true,
            enable_poller: true,
            server: ServerOptions::default(),
            poller: poller::Options::default(),
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5050,
        }
    }
}
