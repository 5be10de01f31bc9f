//! Metrics definitions for the intake service.

use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS: MetricDef = MetricDef {
    name: "intake.requests",
    metric_type: MetricType::Counter,
    description: "Number of intake requests, tagged by outcome",
};

pub const DEDUP_HIT: MetricDef = MetricDef {
    name: "dedup_cache.hit",
    metric_type: MetricType::Counter,
    description: "Number of payloads suppressed as duplicates",
};

pub const DEDUP_MISS: MetricDef = MetricDef {
    name: "dedup_cache.miss",
    metric_type: MetricType::Counter,
    description: "Number of payloads seen for the first time within the window",
};

pub const SIGNATURE_REJECTED: MetricDef = MetricDef {
    name: "intake.signature.rejected",
    metric_type: MetricType::Counter,
    description: "Number of requests rejected for a missing or invalid signature",
};

pub const HANDSHAKES: MetricDef = MetricDef {
    name: "intake.handshakes",
    metric_type: MetricType::Counter,
    description: "Number of handshake requests carrying a verification token",
};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "intake.request.duration",
    metric_type: MetricType::Histogram,
    description: "Time to handle an intake request in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[
    REQUESTS,
    DEDUP_HIT,
    DEDUP_MISS,
    SIGNATURE_REJECTED,
    HANDSHAKES,
    REQUEST_DURATION,
];
