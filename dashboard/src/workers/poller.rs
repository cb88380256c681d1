//! Polling worker for periodic refresh

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::sync::refresher::Refresher;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,

    /// Initial delay before the first poll
    pub initial_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Run the poller worker
pub async fn run<S, F>(
    options: &Options,
    refresher: &Refresher,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Poller worker starting...");

    // Initial delay
    sleep_fn(options.initial_delay).await;

    loop {
        // Check for shutdown
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {
                // Continue with poll
            }
        }

        debug!("Polling backend for updates...");

        match refresher.trigger_refresh().await {
            Ok(_) => {
                debug!("Refresh pass completed");
            }
            Err(e) => {
                error!("Refresh pass failed: {}", e);
            }
        }
    }
}
