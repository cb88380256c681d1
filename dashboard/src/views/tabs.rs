//! Tab navigation and togglable content panes

use crate::views::events::ClickEvent;
use crate::views::html::{el, Html};

/// A tab definition for the navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSpec {
    pub id: String,
    pub text: String,
}

/// One content pane of a togglable tab group
#[derive(Debug, Clone)]
pub struct TabPane {
    pub id: String,
    pub content: Html,
    pub is_active: bool,
}

impl TabPane {
    pub fn new(id: impl Into<String>, content: Html) -> Self {
        Self {
            id: id.into(),
            content,
            is_active: false,
        }
    }
}

/// Tab navigation bar
pub struct NavTabs<'a> {
    pub active_tab_id: &'a str,
    pub tabs: &'a [TabSpec],
}

impl NavTabs<'_> {
    pub fn render(&self) -> Html {
        let items = self.tabs.iter().map(|tab| {
            let link = el("a")
                .attr("href", &format!("?tab={}", tab.id))
                .attr("data-tab-id", &tab.id)
                .text(tab.text.as_str())
                .build();
            let mut item = el("li");
            if tab.id == self.active_tab_id {
                item = item.class("active");
            }
            item.child(link).build()
        });
        el("ul").class("nav nav-tabs").children(items).build()
    }
}

/// Togglable tab group
///
/// Optional nav bar plus all content panes; the active pane is derived from
/// the active tab id supplied by the controlling parent. No internal state.
pub struct TogglableTabs<'a> {
    pub active_tab_id: &'a str,
    pub class_name: Option<&'a str>,
    pub tabs: Option<&'a [TabSpec]>,
    pub on_tab_click: Option<&'a dyn Fn(&str)>,
    pub children: Vec<TabPane>,
}

impl TogglableTabs<'_> {
    /// Children with `is_active` derived from the active tab id
    pub fn resolved_children(&self) -> Vec<TabPane> {
        self.children
            .iter()
            .map(|pane| TabPane {
                id: pane.id.clone(),
                content: pane.content.clone(),
                is_active: pane.id == self.active_tab_id,
            })
            .collect()
    }

    /// Invoke the tab-click handler, suppressing default navigation
    pub fn handle_tab_click(&self, event: &mut ClickEvent, tab_id: &str) {
        event.prevent_default();
        if let Some(on_tab_click) = self.on_tab_click {
            on_tab_click(tab_id);
        }
    }

    pub fn render(&self) -> Html {
        // nav only when both a handler and a tab list are supplied
        let nav = match (self.on_tab_click, self.tabs) {
            (Some(_), Some(tabs)) => NavTabs {
                active_tab_id: self.active_tab_id,
                tabs,
            }
            .render(),
            _ => Html::Empty,
        };

        let panes = self.resolved_children().into_iter().map(|pane| {
            let mut element = el("div").class("tab-pane").attr("data-tab-id", &pane.id);
            if pane.is_active {
                element = element.class("active");
            }
            element.child(pane.content).build()
        });

        let mut root = el("div");
        if let Some(class_name) = self.class_name {
            root = root.class(class_name);
        }
        root.child(nav)
            .child(el("div").class("tab-content").children(panes).build())
            .build()
    }
}
