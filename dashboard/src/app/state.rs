//! Application state management

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::models::deployment::DeploymentCollection;
use crate::models::task::TaskCollection;
use crate::store::binding::Binding;
use crate::store::observe::ResourceEvent;
use crate::store::resource::RemoteResource;
use crate::sync::refresher::Refresher;

/// Cache of rendered pages, invalidated whenever an observed store changes
pub struct RenderCache {
    pages: Mutex<HashMap<String, String>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a cached page, rendering and storing it on a miss
    pub fn get_or_render(&self, key: &str, render: impl FnOnce() -> String) -> String {
        let mut pages = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        match pages.get(key) {
            Some(page) => page.clone(),
            None => {
                let page = render();
                pages.insert(key.to_string(), page.clone());
                page
            }
        }
    }

    /// Drop every cached page
    pub fn invalidate(&self) {
        self.pages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.pages.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state
pub struct AppState {
    /// HTTP client for the backend
    pub http_client: Arc<HttpClient>,

    /// Cluster-wide deployments
    pub deployments: Arc<DeploymentCollection>,

    /// Tasks of the observed application
    pub tasks: Arc<TaskCollection>,

    /// Application the task collection observes
    pub app_id: String,

    /// Refresh orchestration
    pub refresher: Arc<Refresher>,

    /// Rendered page cache
    pub render_cache: Arc<RenderCache>,

    /// Cache-invalidation bindings; released on shutdown
    bindings: Mutex<Vec<Binding>>,
}

impl AppState {
    /// Initialize application state
    pub fn init(app_id: &str, http_client: Arc<HttpClient>) -> Result<Arc<Self>, DashError> {
        info!("Initializing dashboard state...");

        let deployments = Arc::new(DeploymentCollection::new());
        let tasks = Arc::new(TaskCollection::new(app_id));
        let render_cache = Arc::new(RenderCache::new());

        let resources: Vec<Arc<dyn RemoteResource>> = vec![
            deployments.clone() as Arc<dyn RemoteResource>,
            tasks.clone() as Arc<dyn RemoteResource>,
        ];
        let refresher = Arc::new(Refresher::new(http_client.clone(), resources));

        // Any store mutation invalidates every cached page
        let mut bindings = Vec::new();
        {
            let cache = render_cache.clone();
            bindings.push(Binding::bind(
                deployments.collection(),
                Arc::new(move |_: &ResourceEvent| cache.invalidate()),
            ));
        }
        {
            let cache = render_cache.clone();
            bindings.push(Binding::bind(
                tasks.collection(),
                Arc::new(move |_: &ResourceEvent| cache.invalidate()),
            ));
        }

        Ok(Arc::new(Self {
            http_client,
            deployments,
            tasks,
            app_id: app_id.to_string(),
            refresher,
            render_cache,
            bindings: Mutex::new(bindings),
        }))
    }

    /// Shutdown application state, releasing the store bindings
    pub fn shutdown(&self) {
        info!("Shutting down dashboard state...");
        self.bindings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
