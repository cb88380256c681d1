//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html as HtmlResponse, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::models::app_version::AppVersionStore;
use crate::models::task::Task;
use crate::server::state::ServerState;
use crate::store::collection::ModelRef;
use crate::store::observe::FetchState;
use crate::store::resource::RemoteResource;
use crate::utils::version_info;
use crate::views::pages::{
    app_version_detail, layout, DashboardPage, TAB_DEPLOYMENTS, TAB_TASKS,
};
use crate::views::task_detail::TaskDetail;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "taskdeck".to_string(),
        version: version.version,
    })
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// Per-store status
#[derive(Debug, Serialize)]
pub struct StoreStatus {
    pub fetch_state: FetchState,
    pub members: usize,
}

/// Store status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub deployments: StoreStatus,
    pub tasks: StoreStatus,
    pub observed_app: String,
}

/// Store status handler
pub async fn status_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let app = &state.app;
    Json(StatusResponse {
        deployments: StoreStatus {
            fetch_state: app.deployments.collection().fetch_state(),
            members: app.deployments.collection().len(),
        },
        tasks: StoreStatus {
            fetch_state: app.tasks.collection().fetch_state(),
            members: app.tasks.collection().len(),
        },
        observed_app: app.app_id.clone(),
    })
}

/// Manual refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
}

/// Manual refresh handler
pub async fn refresh_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    match state.app.refresher.trigger_refresh().await {
        Ok(_) => Json(RefreshResponse {
            success: true,
            message: "Refresh completed".to_string(),
        }),
        Err(e) => Json(RefreshResponse {
            success: false,
            message: format!("Refresh failed: {}", e),
        }),
    }
}

/// Dashboard page handler
pub async fn dashboard_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let app = &state.app;
    let active_tab = match params.get("tab").map(String::as_str) {
        Some(TAB_TASKS) => TAB_TASKS,
        _ => TAB_DEPLOYMENTS,
    };

    let page = app
        .render_cache
        .get_or_render(&format!("dashboard:{}", active_tab), || {
            let body = DashboardPage {
                deployments: &app.deployments,
                tasks: &app.tasks,
                active_tab_id: active_tab,
            }
            .render();
            layout("Taskdeck", body)
        });
    HtmlResponse(page)
}

/// Task detail page handler
pub async fn task_detail_handler(
    State(state): State<Arc<ServerState>>,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    let app = &state.app;
    let collection = app.tasks.collection();

    // An unknown id renders the detail view's stale-record error state
    let task = collection
        .get(&task_id)
        .unwrap_or_else(|| ModelRef::detached(Task::placeholder(task_id.as_str())));

    let has_health = !task.read().health_check_results.is_empty();
    let on_show_task_list = || {};
    let detail = TaskDetail {
        task: &task,
        fetch_state: collection.fetch_state(),
        has_health,
        health_message: None,
        on_show_task_list: &on_show_task_list,
    };
    HtmlResponse(layout("Taskdeck Task Details", detail.render()))
}

/// Version detail page handler; fetches the version on demand
pub async fn version_detail_handler(
    State(state): State<Arc<ServerState>>,
    Path((app_id, version)): Path<(String, String)>,
) -> Result<impl IntoResponse, StatusCode> {
    let store = AppVersionStore::new(&app_id, &version);
    if let Err(e) = store.fetch(state.app.http_client.as_ref()).await {
        warn!("Version fetch failed: {}", e);
        return Err(StatusCode::BAD_GATEWAY);
    }

    let Some(record) = store.store().get() else {
        return Err(StatusCode::NOT_FOUND);
    };

    Ok(HtmlResponse(layout(
        "Taskdeck Version Details",
        app_version_detail(&app_id, &record),
    )))
}
