//! Page composition for the dashboard server

use crate::models::app_version::AppVersion;
use crate::models::deployment::DeploymentCollection;
use crate::models::task::TaskCollection;
use crate::store::observe::FetchState;
use crate::utils::format_timestamp;
use crate::views::html::{el, Html};
use crate::views::tabs::{TabPane, TabSpec, TogglableTabs};

pub const TAB_DEPLOYMENTS: &str = "deployments";
pub const TAB_TASKS: &str = "tasks";

/// Wrap body content in a full HTML document
pub fn layout(title: &str, body: Html) -> String {
    let document = el("html")
        .child(el("head").child(el("title").text(title).build()).build())
        .child(el("body").child(body).build())
        .build();
    format!("<!DOCTYPE html>{}", document.to_html())
}

/// The main dashboard page: deployments and tasks in togglable tabs
pub struct DashboardPage<'a> {
    pub deployments: &'a DeploymentCollection,
    pub tasks: &'a TaskCollection,
    pub active_tab_id: &'a str,
}

impl DashboardPage<'_> {
    pub fn render(&self) -> Html {
        let tabs = [
            TabSpec {
                id: TAB_DEPLOYMENTS.to_string(),
                text: "Deployments".to_string(),
            },
            TabSpec {
                id: TAB_TASKS.to_string(),
                text: "Tasks".to_string(),
            },
        ];
        // navigation happens through the rendered query links; the handler
        // only gates the nav bar
        let on_tab_click = |_: &str| {};
        TogglableTabs {
            active_tab_id: self.active_tab_id,
            class_name: Some("dashboard"),
            tabs: Some(&tabs),
            on_tab_click: Some(&on_tab_click),
            children: vec![
                TabPane::new(TAB_DEPLOYMENTS, self.render_deployments()),
                TabPane::new(TAB_TASKS, self.render_tasks()),
            ],
        }
        .render()
    }

    fn render_deployments(&self) -> Html {
        let collection = self.deployments.collection();
        if collection.fetch_state() == FetchState::Error {
            return fetch_error_message("deployments");
        }

        let rows = collection.members().into_iter().map(|member| {
            let deployment = member.snapshot();
            el("tr")
                .child(el("td").text(deployment.id.as_str()).build())
                .child(el("td").text(deployment.affected_apps.join(", ")).build())
                .child(
                    el("td")
                        .text(format!(
                            "{}/{}",
                            deployment.current_step, deployment.total_steps
                        ))
                        .build(),
                )
                .child(el("td").text(deployment.version.as_str()).build())
                .build()
        });

        el("table")
            .class("table table-striped deployments")
            .child(
                el("thead")
                    .child(
                        el("tr")
                            .child(el("th").text("ID").build())
                            .child(el("th").text("Affected apps").build())
                            .child(el("th").text("Progress").build())
                            .child(el("th").text("Version").build())
                            .build(),
                    )
                    .build(),
            )
            .child(el("tbody").children(rows).build())
            .build()
    }

    fn render_tasks(&self) -> Html {
        let collection = self.tasks.collection();
        if collection.fetch_state() == FetchState::Error {
            return fetch_error_message("tasks");
        }

        let rows = collection.members().into_iter().map(|member| {
            let task = member.snapshot();
            let health = task.health();
            el("tr")
                .child(
                    el("td")
                        .child(
                            el("a")
                                .attr("href", &format!("/tasks/{}", task.id))
                                .text(task.id.as_str())
                                .build(),
                        )
                        .build(),
                )
                .child(el("td").text(task.host.as_str()).build())
                .child(el("td").text(task.status.as_str()).build())
                .child(el("td").text(health.label()).build())
                .build()
        });

        el("table")
            .class("table table-striped tasks")
            .child(
                el("thead")
                    .child(
                        el("tr")
                            .child(el("th").text("ID").build())
                            .child(el("th").text("Host").build())
                            .child(el("th").text("Status").build())
                            .child(el("th").text("Health").build())
                            .build(),
                    )
                    .build(),
            )
            .child(el("tbody").children(rows).build())
            .build()
    }
}

/// Inline fetch-failure message with a recovery link
fn fetch_error_message(what: &str) -> Html {
    el("p")
        .class("text-center text-danger")
        .text(format!("Error fetching {}. ", what))
        .child(el("a").attr("href", "/").text("Refresh").build())
        .build()
}

/// Version detail page body
pub fn app_version_detail(app_id: &str, version: &AppVersion) -> Html {
    let parsed = version
        .parsed_version()
        .map(|time| format_timestamp(&time))
        .unwrap_or_else(|_| version.version.clone());

    let mut list = el("dl")
        .class("dl-horizontal")
        .child(el("dt").text("App").build())
        .child(el("dd").text(app_id).build())
        .child(el("dt").text("Version").build())
        .child(
            el("dd")
                .child(
                    el("time")
                        .attr("datetime", version.version.as_str())
                        .text(parsed)
                        .build(),
                )
                .build(),
        )
        .child(el("dt").text("Instances").build())
        .child(el("dd").text(version.instances.to_string()).build())
        .child(el("dt").text("CPUs").build())
        .child(el("dd").text(version.cpus.to_string()).build())
        .child(el("dt").text("Memory").build())
        .child(el("dd").text(format!("{} MiB", version.mem)).build());

    if let Some(cmd) = &version.cmd {
        list = list
            .child(el("dt").text("Command").build())
            .child(el("dd").child(el("code").text(cmd.as_str()).build()).build());
    }

    el("div")
        .child(el("h5").text("Version Details").build())
        .child(list.build())
        .build()
}
