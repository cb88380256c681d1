//! Error types for the taskdeck dashboard

use thiserror::Error;

/// Main error type for taskdeck
#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: http::StatusCode,
        body: String,
    },

    #[error("Time parse error: {0}")]
    TimeParseError(#[from] chrono::ParseError),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for DashError {
    fn from(err: anyhow::Error) -> Self {
        DashError::Internal(err.to_string())
    }
}
