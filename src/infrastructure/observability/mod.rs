//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_dashboard_render,
    record_dashboard_section_failure, record_http_request, PrometheusMetrics,
};
