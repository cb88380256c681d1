//! Main application run loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::app::state::AppState;
use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::workers::poller;

/// Run the dashboard
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DashError> {
    info!("Initializing Taskdeck...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager =
        ShutdownManager::new(shutdown_tx.clone(), options.max_shutdown_delay);

    // Initialize the app state and workers
    if let Err(e) = init(&options, shutdown_tx.clone(), &mut shutdown_manager).await {
        error!("Failed to start dashboard: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    tokio::select! {
        _ = shutdown_signal => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init(
    options: &AppOptions,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), DashError> {
    let http_client = Arc::new(HttpClient::new(&options.backend_base_url)?);
    let app_state = AppState::init(&options.app_id, http_client)?;
    shutdown_manager.with_app_state(app_state.clone())?;

    // Best-effort initial refresh so the first page render has data
    if let Err(e) = app_state.refresher.trigger_refresh().await {
        error!("Initial refresh failed: {}", e);
    }

    if options.enable_poller {
        init_poller_worker(
            options.poller.clone(),
            app_state.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )?;
    }

    if options.enable_server {
        init_server(
            options,
            app_state.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )
        .await?;
    }

    Ok(())
}

fn init_poller_worker(
    options: poller::Options,
    app_state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashError> {
    info!("Initializing poller worker...");

    let refresher = app_state.refresher.clone();
    let handle = tokio::spawn(async move {
        poller::run(
            &options,
            refresher.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_poller_worker_handle(handle)
}

async fn init_server(
    options: &AppOptions,
    app_state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashError> {
    info!("Initializing dashboard server...");

    let server_state = ServerState::new(app_state);
    let handle = serve(&options.server, Arc::new(server_state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_server_handle(handle)
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    max_shutdown_delay: Duration,
    app_state: Option<Arc<AppState>>,
    server_handle: Option<JoinHandle<Result<(), DashError>>>,
    poller_worker_handle: Option<JoinHandle<()>>,
}

impl ShutdownManager {
    fn new(shutdown_tx: broadcast::Sender<()>, max_shutdown_delay: Duration) -> Self {
        Self {
            shutdown_tx,
            max_shutdown_delay,
            app_state: None,
            server_handle: None,
            poller_worker_handle: None,
        }
    }

    fn with_app_state(&mut self, state: Arc<AppState>) -> Result<(), DashError> {
        if self.app_state.is_some() {
            return Err(DashError::ShutdownError("app_state already set".to_string()));
        }
        self.app_state = Some(state);
        Ok(())
    }

    fn with_poller_worker_handle(&mut self, handle: JoinHandle<()>) -> Result<(), DashError> {
        if self.poller_worker_handle.is_some() {
            return Err(DashError::ShutdownError(
                "poller_handle already set".to_string(),
            ));
        }
        self.poller_worker_handle = Some(handle);
        Ok(())
    }

    fn with_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), DashError>>,
    ) -> Result<(), DashError> {
        if self.server_handle.is_some() {
            return Err(DashError::ShutdownError(
                "server_handle already set".to_string(),
            ));
        }
        self.server_handle = Some(handle);
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), DashError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(self.max_shutdown_delay, self.shutdown_impl()).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, forcing shutdown...",
                    self.max_shutdown_delay
                );
                std::process::exit(1);
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), DashError> {
        info!("Shutting down Taskdeck...");

        // 1. Poller worker
        if let Some(handle) = self.poller_worker_handle.take() {
            handle
                .await
                .map_err(|e| DashError::ShutdownError(e.to_string()))?;
        }

        // 2. Server
        if let Some(handle) = self.server_handle.take() {
            handle
                .await
                .map_err(|e| DashError::ShutdownError(e.to_string()))??;
        }

        // 3. App state
        if let Some(state) = self.app_state.take() {
            state.shutdown();
        }

        info!("Shutdown complete");
        Ok(())
    }
}
