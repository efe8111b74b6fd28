use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

///
/// RouteCounters
/// Process-wide, lock-free counters; routing runs on many threads at once.
///

pub(crate) struct RouteCounters {
    pub(crate) quick_format: AtomicU64,
    pub(crate) full_parse: AtomicU64,
    pub(crate) default_routes: AtomicU64,
    pub(crate) values_rejected: AtomicU64,

    pub(crate) range_calls: AtomicU64,
    pub(crate) range_routes: AtomicU64,
    pub(crate) create_calls: AtomicU64,
    pub(crate) create_routes: AtomicU64,
    pub(crate) scan_calls: AtomicU64,
    pub(crate) scan_routes: AtomicU64,

    pub(crate) discovery_calls: AtomicU64,
    pub(crate) discovery_empty: AtomicU64,
}

impl RouteCounters {
    const fn new() -> Self {
        Self {
            quick_format: AtomicU64::new(0),
            full_parse: AtomicU64::new(0),
            default_routes: AtomicU64::new(0),
            values_rejected: AtomicU64::new(0),
            range_calls: AtomicU64::new(0),
            range_routes: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
            create_routes: AtomicU64::new(0),
            scan_calls: AtomicU64::new(0),
            scan_routes: AtomicU64::new(0),
            discovery_calls: AtomicU64::new(0),
            discovery_empty: AtomicU64::new(0),
        }
    }

    const fn all(&self) -> [&AtomicU64; 12] {
        [
            &self.quick_format,
            &self.full_parse,
            &self.default_routes,
            &self.values_rejected,
            &self.range_calls,
            &self.range_routes,
            &self.create_calls,
            &self.create_routes,
            &self.scan_calls,
            &self.scan_routes,
            &self.discovery_calls,
            &self.discovery_empty,
        ]
    }
}

pub(crate) static COUNTERS: RouteCounters = RouteCounters::new();

/// Add to one counter, saturating instead of wrapping.
pub(crate) fn add(counter: &AtomicU64, n: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
        Some(v.saturating_add(n))
    });
}

///
/// RouteMetricsReport
/// Point-in-time copy of the routing counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RouteMetricsReport {
    // Single-value resolution
    pub quick_format: u64,
    pub full_parse: u64,
    pub default_routes: u64,
    pub values_rejected: u64,

    // Fan-out entrypoints and the routes they produced
    pub range_calls: u64,
    pub range_routes: u64,
    pub create_calls: u64,
    pub create_routes: u64,
    pub scan_calls: u64,
    pub scan_routes: u64,

    // Schema discovery
    pub discovery_calls: u64,
    pub discovery_empty: u64,
}

pub(crate) fn report() -> RouteMetricsReport {
    let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
    let c = &COUNTERS;

    RouteMetricsReport {
        quick_format: load(&c.quick_format),
        full_parse: load(&c.full_parse),
        default_routes: load(&c.default_routes),
        values_rejected: load(&c.values_rejected),
        range_calls: load(&c.range_calls),
        range_routes: load(&c.range_routes),
        create_calls: load(&c.create_calls),
        create_routes: load(&c.create_routes),
        scan_calls: load(&c.scan_calls),
        scan_routes: load(&c.scan_routes),
        discovery_calls: load(&c.discovery_calls),
        discovery_empty: load(&c.discovery_empty),
    }
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    for counter in COUNTERS.all() {
        counter.store(0, Ordering::Relaxed);
    }
}
