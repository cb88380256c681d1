//! Task health check details

use crate::models::task::Task;
use crate::views::fields::TimeField;
use crate::views::html::{el, Html};

/// Per-check health details for a task
pub struct TaskHealthView<'a> {
    pub task: &'a Task,
}

impl TaskHealthView<'_> {
    pub fn render(&self) -> Html {
        let checks = self
            .task
            .health_check_results
            .iter()
            .enumerate()
            .map(|(index, result)| {
                let mut list = el("dl")
                    .class("dl-horizontal")
                    .child(el("dt").text("Alive").build())
                    .child(
                        el("dd")
                            .text(if result.alive { "Yes" } else { "No" })
                            .build(),
                    )
                    .child(el("dt").text("Consecutive failures").build())
                    .child(
                        el("dd")
                            .text(result.consecutive_failures.to_string())
                            .build(),
                    );

                let times = [
                    TimeField {
                        label: "First success",
                        time: result.first_success,
                    },
                    TimeField {
                        label: "Last success",
                        time: result.last_success,
                    },
                    TimeField {
                        label: "Last failure",
                        time: result.last_failure,
                    },
                ];
                for field in &times {
                    for node in field.render() {
                        list = list.child(node);
                    }
                }

                el("div")
                    .class("health-check")
                    .child(el("h6").text(format!("Health check #{}", index + 1)).build())
                    .child(list.build())
                    .build()
            });

        el("div")
            .class("task-health")
            .child(el("h5").text("Health Checks").build())
            .children(checks)
            .build()
    }
}
