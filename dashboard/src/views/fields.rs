//! Labeled timestamp fields

use chrono::{DateTime, Utc};

use crate::utils::format_timestamp;
use crate::views::html::{el, Html};

/// A (label, timestamp) definition-list pair
pub struct TimeField<'a> {
    pub label: &'a str,
    pub time: Option<DateTime<Utc>>,
}

impl TimeField<'_> {
    /// Render as a `<dt>`/`<dd>` pair
    pub fn render(&self) -> Vec<Html> {
        let value = match &self.time {
            Some(time) => el("time")
                .attr("datetime", &time.to_rfc3339())
                .text(format_timestamp(time))
                .build(),
            None => Html::text("Never"),
        };
        vec![el("dt").text(self.label).build(), el("dd").child(value).build()]
    }
}
