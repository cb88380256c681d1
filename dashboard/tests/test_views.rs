//! Presentational component tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use taskdeck::models::task::{HealthCheckResult, Task};
use taskdeck::store::collection::{Collection, ModelRef};
use taskdeck::store::observe::FetchState;
use taskdeck::views::events::ClickEvent;
use taskdeck::views::html::{el, Html};
use taskdeck::views::tabs::{TabPane, TabSpec, TogglableTabs};
use taskdeck::views::task_detail::TaskDetail;

fn sample_task(id: &str) -> Task {
    Task {
        id: id.to_string(),
        app_id: "/webapp".to_string(),
        host: "node-1.cluster".to_string(),
        ports: vec![8080, 8081],
        status: "TASK_RUNNING".to_string(),
        staged_at: Some("2015-09-30T09:09:10.000Z".parse().unwrap()),
        started_at: Some("2015-09-30T09:09:17.614Z".parse().unwrap()),
        version: "2015-09-30T09:09:00.000Z".to_string(),
        health_check_results: Vec::new(),
    }
}

fn check(alive: bool) -> HealthCheckResult {
    HealthCheckResult {
        alive,
        consecutive_failures: 0,
        first_success: None,
        last_success: None,
        last_failure: None,
        task_id: None,
    }
}

fn attached(task: Task) -> ModelRef<Task> {
    let collection: Collection<Task> = Collection::new("/v2/apps/webapp/tasks");
    let id = task.id.clone();
    collection.add(task);
    collection.get(&id).unwrap()
}

fn noop() {}

#[test]
fn test_error_state_renders_message_without_detail_block() {
    let task = attached(sample_task("webapp.1"));
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Error,
        has_health: true,
        health_message: None,
        on_show_task_list: &noop,
    };

    let html = detail.render().to_html();
    assert!(html.contains("Error fetching task details"));
    assert!(!html.contains("dl-horizontal"));
}

#[test]
fn test_detached_task_renders_error_state() {
    let task = ModelRef::detached(sample_task("webapp.1"));
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Success,
        has_health: false,
        health_message: None,
        on_show_task_list: &noop,
    };

    assert!(detail.has_error());
    let html = detail.render().to_html();
    assert!(html.contains("Error fetching task details"));
    // breadcrumb still shows the task id
    assert!(html.contains("webapp.1"));
}

#[test]
fn test_healthy_task_renders_detail_block_with_health_component() {
    let mut record = sample_task("webapp.1");
    record.health_check_results = vec![check(true)];
    let task = attached(record);
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Success,
        has_health: true,
        health_message: None,
        on_show_task_list: &noop,
    };

    let html = detail.render().to_html();
    assert!(!html.contains("Error fetching task details"));
    assert!(html.contains("dl-horizontal"));
    assert!(html.contains("node-1.cluster"));
    assert!(html.contains("[8080,8081]"));
    assert!(html.contains("task-health"));
    assert!(html.contains("Healthy"));
}

#[test]
fn test_has_health_false_hides_health_component() {
    let mut record = sample_task("webapp.1");
    record.health_check_results = vec![check(true)];
    let task = attached(record);
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Success,
        has_health: false,
        health_message: None,
        on_show_task_list: &noop,
    };

    let html = detail.render().to_html();
    assert!(html.contains("dl-horizontal"));
    assert!(!html.contains("task-health"));
}

#[test]
fn test_unhealthy_task_gets_danger_class() {
    let mut record = sample_task("webapp.1");
    record.health_check_results = vec![check(true), check(false)];
    let task = attached(record);
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Success,
        has_health: false,
        health_message: None,
        on_show_task_list: &noop,
    };

    let html = detail.render().to_html();
    assert!(html.contains("text-unhealthy"));
    assert!(html.contains("Unhealthy"));
}

#[test]
fn test_unknown_health_gets_muted_class() {
    let task = attached(sample_task("webapp.1"));
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Success,
        has_health: false,
        health_message: None,
        on_show_task_list: &noop,
    };

    let html = detail.render().to_html();
    assert!(html.contains("text-muted"));
    assert!(html.contains("Unknown"));
}

#[test]
fn test_health_message_override() {
    let task = attached(sample_task("webapp.1"));
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Success,
        has_health: false,
        health_message: Some("All checks passing"),
        on_show_task_list: &noop,
    };

    assert!(detail.render().to_html().contains("All checks passing"));
}

#[test]
fn test_show_task_list_click_prevents_default_and_navigates() {
    let clicked = Arc::new(AtomicBool::new(false));
    let flag = clicked.clone();
    let on_show_task_list = move || {
        flag.store(true, Ordering::SeqCst);
    };

    let task = attached(sample_task("webapp.1"));
    let detail = TaskDetail {
        task: &task,
        fetch_state: FetchState::Success,
        has_health: false,
        health_message: None,
        on_show_task_list: &on_show_task_list,
    };

    let mut event = ClickEvent::new();
    detail.handle_show_task_list(&mut event);
    assert!(event.default_prevented());
    assert!(clicked.load(Ordering::SeqCst));
}

fn pane(id: &str) -> TabPane {
    TabPane::new(id, el("span").text(id).build())
}

#[test]
fn test_togglable_tabs_marks_only_active_child() {
    let group = TogglableTabs {
        active_tab_id: "b",
        class_name: None,
        tabs: None,
        on_tab_click: None,
        children: vec![pane("a"), pane("b"), pane("c")],
    };

    let children = group.resolved_children();
    let active: Vec<&str> = children
        .iter()
        .filter(|p| p.is_active)
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(active, vec!["b"]);
}

#[test]
fn test_nav_rendered_only_with_handler_and_tabs() {
    let tabs = vec![
        TabSpec {
            id: "a".to_string(),
            text: "A".to_string(),
        },
        TabSpec {
            id: "b".to_string(),
            text: "B".to_string(),
        },
    ];
    let on_tab_click = |_: &str| {};

    let with_both = TogglableTabs {
        active_tab_id: "a",
        class_name: Some("dashboard"),
        tabs: Some(&tabs),
        on_tab_click: Some(&on_tab_click),
        children: vec![pane("a"), pane("b")],
    };
    assert!(with_both.render().to_html().contains("nav nav-tabs"));

    let without_tabs = TogglableTabs {
        active_tab_id: "a",
        class_name: None,
        tabs: None,
        on_tab_click: Some(&on_tab_click),
        children: vec![pane("a")],
    };
    assert!(!without_tabs.render().to_html().contains("nav nav-tabs"));

    let without_handler = TogglableTabs {
        active_tab_id: "a",
        class_name: None,
        tabs: Some(&tabs),
        on_tab_click: None,
        children: vec![pane("a")],
    };
    assert!(!without_handler.render().to_html().contains("nav nav-tabs"));
}

#[test]
fn test_active_pane_carries_active_class() {
    let group = TogglableTabs {
        active_tab_id: "b",
        class_name: None,
        tabs: None,
        on_tab_click: None,
        children: vec![pane("a"), pane("b")],
    };

    let html = group.render().to_html();
    assert!(html.contains(r#"class="tab-pane active" data-tab-id="b""#));
    assert!(html.contains(r#"class="tab-pane" data-tab-id="a""#));
}

#[test]
fn test_tab_click_handler_receives_tab_id() {
    let selected: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let sink = selected.clone();
    let on_tab_click = move |tab_id: &str| {
        *sink.lock().unwrap() = Some(tab_id.to_string());
    };

    let group = TogglableTabs {
        active_tab_id: "a",
        class_name: None,
        tabs: None,
        on_tab_click: Some(&on_tab_click),
        children: Vec::new(),
    };

    let mut event = ClickEvent::new();
    group.handle_tab_click(&mut event, "b");
    assert!(event.default_prevented());
    assert_eq!(selected.lock().unwrap().as_deref(), Some("b"));
}

#[test]
fn test_empty_html_is_shared_placeholder() {
    assert_eq!(Html::Empty.to_html(), "");
}
