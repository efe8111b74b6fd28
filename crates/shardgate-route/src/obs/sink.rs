//! Metrics sink boundary.
//!
//! Routing logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through RouteEvent and MetricsSink.
use crate::obs::metrics::{self, COUNTERS};
use std::{cell::RefCell, sync::Arc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Arc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// ResolvePath
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvePath {
    QuickFormat,
    FullParse,
}

///
/// FanOutKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FanOutKind {
    Range,
    Create,
    Scan,
}

///
/// RouteEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteEvent {
    Resolve { path: ResolvePath },
    DefaultRoute,
    ValueRejected,
    FanOut { kind: FanOutKind, routes: u64 },
    Discovery { matched: u64 },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: RouteEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the process-wide counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: RouteEvent) {
        let c = &COUNTERS;

        match event {
            RouteEvent::Resolve { path } => match path {
                ResolvePath::QuickFormat => metrics::add(&c.quick_format, 1),
                ResolvePath::FullParse => metrics::add(&c.full_parse, 1),
            },

            RouteEvent::DefaultRoute => metrics::add(&c.default_routes, 1),

            RouteEvent::ValueRejected => metrics::add(&c.values_rejected, 1),

            RouteEvent::FanOut { kind, routes } => {
                let (calls, total) = match kind {
                    FanOutKind::Range => (&c.range_calls, &c.range_routes),
                    FanOutKind::Create => (&c.create_calls, &c.create_routes),
                    FanOutKind::Scan => (&c.scan_calls, &c.scan_routes),
                };
                metrics::add(calls, 1);
                metrics::add(total, routes);
            }

            RouteEvent::Discovery { matched } => {
                metrics::add(&c.discovery_calls, 1);
                if matched == 0 {
                    metrics::add(&c.discovery_empty, 1);
                }
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: RouteEvent) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the process-wide routing counters.
#[must_use]
pub fn metrics_report() -> metrics::RouteMetricsReport {
    metrics::report()
}

/// Reset all routing counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Arc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Arc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
