//! Task detail view

use chrono::{DateTime, Utc};

use crate::models::task::{Task, TaskHealth};
use crate::store::collection::ModelRef;
use crate::store::observe::FetchState;
use crate::utils::format_timestamp;
use crate::views::events::ClickEvent;
use crate::views::fields::TimeField;
use crate::views::health::TaskHealthView;
use crate::views::html::{el, Html};

/// Detail view of one task
pub struct TaskDetail<'a> {
    pub task: &'a ModelRef<Task>,
    pub fetch_state: FetchState,
    pub has_health: bool,
    /// Overrides the label derived from the task's health classification
    pub health_message: Option<&'a str>,
    pub on_show_task_list: &'a dyn Fn(),
}

impl TaskDetail<'_> {
    /// Navigate back to the task list, suppressing default navigation
    pub fn handle_show_task_list(&self, event: &mut ClickEvent) {
        event.prevent_default();
        (self.on_show_task_list)();
    }

    /// Fetch failed, or the task was dropped from its owning collection
    pub fn has_error(&self) -> bool {
        self.fetch_state == FetchState::Error || !self.task.is_attached()
    }

    pub fn render(&self) -> Html {
        let task = self.task.snapshot();

        let breadcrumb = el("ol")
            .class("breadcrumb")
            .child(
                el("li")
                    .child(task_list_link("Task List"))
                    .build(),
            )
            .child(el("li").class("active").text(task.id.as_str()).build())
            .build();

        let body = if self.has_error() {
            el("p")
                .class("text-center text-danger")
                .text("Error fetching task details. Go to ")
                .child(task_list_link("Task List"))
                .text(" to see the full list.")
                .build()
        } else {
            self.render_detail(&task)
        };

        el("div")
            .child(breadcrumb)
            .child(el("h5").text("Task Details").build())
            .child(body)
            .build()
    }

    fn render_detail(&self, task: &Task) -> Html {
        let health = task.health();
        let health_class = match health {
            TaskHealth::Unhealthy => "text-unhealthy",
            TaskHealth::Unknown => "text-muted",
            TaskHealth::Healthy => "",
        };
        let health_message = self
            .health_message
            .map(str::to_string)
            .unwrap_or_else(|| health.label().to_string());

        let ports = format!(
            "[{}]",
            task.ports
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",")
        );

        let mut list = el("dl")
            .class("dl-horizontal")
            .child(el("dt").text("Host").build())
            .child(el("dd").text(task.host.as_str()).build())
            .child(el("dt").text("Ports").build())
            .child(el("dd").text(ports).build())
            .child(el("dt").text("Status").build())
            .child(el("dd").text(task.status.as_str()).build());

        let times = [
            TimeField {
                label: "Staged at",
                time: task.staged_at,
            },
            TimeField {
                label: "Started at",
                time: task.started_at,
            },
        ];
        for field in &times {
            for node in field.render() {
                list = list.child(node);
            }
        }

        let version_display = DateTime::parse_from_rfc3339(&task.version)
            .map(|time| format_timestamp(&time.with_timezone(&Utc)))
            .unwrap_or_else(|_| task.version.clone());
        list = list
            .child(el("dt").text("Version").build())
            .child(
                el("dd")
                    .child(
                        el("time")
                            .attr("datetime", &task.version)
                            .text(version_display)
                            .build(),
                    )
                    .build(),
            )
            .child(el("dt").text("Health").build())
            .child(el("dd").class(health_class).text(health_message).build());

        let health_section = if self.has_health {
            TaskHealthView { task }.render()
        } else {
            Html::Empty
        };

        el("div").child(list.build()).child(health_section).build()
    }
}

fn task_list_link(text: &str) -> Html {
    el("a")
        .attr("href", "#")
        .attr("data-action", "show-task-list")
        .text(text)
        .build()
}
