//! Observability: routing counters and the sink boundary they flow through.
//!
//! Routing code records `RouteEvent`s only; it never touches counter state.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::RouteMetricsReport;
pub use sink::{
    FanOutKind, MetricsSink, ResolvePath, RouteEvent, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
