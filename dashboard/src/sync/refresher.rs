//! Backend refresh orchestration

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::store::resource::RemoteResource;

/// Refresh state
#[derive(Debug, Clone)]
pub struct RefreshState {
    pub last_attempted_at: DateTime<Utc>,
    pub last_refreshed_at: DateTime<Utc>,
    pub cooldown_ends_at: DateTime<Utc>,
    pub err_streak: u32,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self {
            last_attempted_at: DateTime::<Utc>::MIN_UTC,
            last_refreshed_at: DateTime::<Utc>::MIN_UTC,
            cooldown_ends_at: DateTime::<Utc>::MIN_UTC,
            err_streak: 0,
        }
    }
}

impl RefreshState {
    pub fn is_in_cooldown(&self) -> bool {
        Utc::now() < self.cooldown_ends_at
    }
}

/// Cooldown options for exponential backoff
#[derive(Debug, Clone)]
pub struct CooldownOptions {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for CooldownOptions {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(300), // 5 minutes
            multiplier: 2.0,
        }
    }
}

/// Calculate exponential backoff delay
fn calc_exp_backoff(options: &CooldownOptions, attempt: u32) -> Duration {
    let delay_secs = options.base_delay.as_secs_f64() * options.multiplier.powi(attempt as i32);
    let capped_delay = delay_secs.min(options.max_delay.as_secs_f64());
    Duration::from_secs_f64(capped_delay)
}

/// Fetches every registered store from the backend
pub struct Refresher {
    http_client: Arc<HttpClient>,
    resources: Vec<Arc<dyn RemoteResource>>,
    state: RwLock<RefreshState>,
    cooldown_options: CooldownOptions,
}

impl Refresher {
    /// Create a new refresher over the given stores
    pub fn new(http_client: Arc<HttpClient>, resources: Vec<Arc<dyn RemoteResource>>) -> Self {
        Self {
            http_client,
            resources,
            state: RwLock::new(RefreshState::default()),
            cooldown_options: CooldownOptions::default(),
        }
    }

    /// Trigger a refresh of every resource
    ///
    /// Skipped while in cooldown. A failed fetch arms the cooldown; the
    /// remaining resources are still attempted so one failing endpoint does
    /// not starve the others.
    pub async fn trigger_refresh(&self) -> Result<(), DashError> {
        {
            let state = self.state.read().await;
            if state.is_in_cooldown() {
                debug!("Refresh in cooldown, skipping...");
                return Ok(());
            }
        }

        {
            let mut state = self.state.write().await;
            state.last_attempted_at = Utc::now();
        }

        let mut first_error: Option<DashError> = None;
        for resource in &self.resources {
            if let Err(e) = resource.fetch(self.http_client.as_ref()).await {
                error!("Fetch failed for {}: {}", resource.name(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            None => {
                let mut state = self.state.write().await;
                state.last_refreshed_at = Utc::now();
                state.err_streak = 0;
                debug!("Refresh completed");
                Ok(())
            }
            Some(e) => {
                let mut state = self.state.write().await;
                state.err_streak += 1;
                let cooldown = calc_exp_backoff(&self.cooldown_options, state.err_streak);
                state.cooldown_ends_at = Utc::now()
                    + chrono::Duration::from_std(cooldown)
                        .unwrap_or_else(|_| chrono::Duration::seconds(1));
                info!(
                    "Refresh failed (streak {}), cooldown until {}",
                    state.err_streak, state.cooldown_ends_at
                );
                Err(e)
            }
        }
    }

    /// Current refresh state
    pub async fn get_state(&self) -> RefreshState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_backoff() {
        let options = CooldownOptions::default();

        assert_eq!(calc_exp_backoff(&options, 0), Duration::from_secs(1));
        assert_eq!(calc_exp_backoff(&options, 1), Duration::from_secs(2));
        assert_eq!(calc_exp_backoff(&options, 2), Duration::from_secs(4));
        assert_eq!(calc_exp_backoff(&options, 10), Duration::from_secs(300)); // Capped at max
    }

    #[test]
    fn test_default_state_not_in_cooldown() {
        assert!(!RefreshState::default().is_in_cooldown());
    }
}
