//! Metrics definitions for the Notion client.

use shared::metrics_defs::{MetricDef, MetricType};

pub const CREATE_PAGE_SUCCESS: MetricDef = MetricDef {
    name: "notion.create_page.success",
    metric_type: MetricType::Counter,
    description: "Number of pages created in Notion",
};

pub const CREATE_PAGE_FAILURE: MetricDef = MetricDef {
    name: "notion.create_page.failure",
    metric_type: MetricType::Counter,
    description: "Number of page creations that failed, tagged by reason",
};

pub const CREATE_PAGE_DURATION: MetricDef = MetricDef {
    name: "notion.create_page.duration",
    metric_type: MetricType::Histogram,
    description: "Time to complete a page creation call in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[
    CREATE_PAGE_SUCCESS,
    CREATE_PAGE_FAILURE,
    CREATE_PAGE_DURATION,
];
