//! Request metrics.
//!
//! Metrics namespaces:
//! - crossmodel.ingress.*
//! - crossmodel.watch.*

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metric names.
pub mod names {
    /// Tokens submitted for ingress resolution.
    pub const INGRESS_REQUESTS_TOTAL: &str = "crossmodel.ingress.requests_total";
    /// Tokens resolved to a CIDR list (possibly empty).
    pub const INGRESS_RESOLVED_TOTAL: &str = "crossmodel.ingress.resolved_total";
    /// Tokens whose relation needs no ingress.
    pub const INGRESS_NO_INGRESS_TOTAL: &str = "crossmodel.ingress.no_ingress_total";
    /// Tokens that failed to resolve.
    pub const INGRESS_ERRORS_TOTAL: &str = "crossmodel.ingress.errors_total";
    /// Subnet watchers currently registered.
    pub const WATCH_ACTIVE_WATCHERS: &str = "crossmodel.watch.active_watchers";
}

/// Counter and gauge registry.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, AtomicU64>>,
    gauges: RwLock<HashMap<String, AtomicU64>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter.
    pub fn counter_inc(&self, name: &str) {
        self.counter_add(name, 1);
    }

    /// Add to a counter.
    pub fn counter_add(&self, name: &str, value: u64) {
        let counters = self.counters.read();
        if let Some(counter) = counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }
        drop(counters);

        self.counters
            .write()
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Get counter value.
    pub fn counter_get(&self, name: &str) -> u64 {
        self.counters
            .read()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Set a gauge value.
    pub fn gauge_set(&self, name: &str, value: u64) {
        let gauges = self.gauges.read();
        if let Some(gauge) = gauges.get(name) {
            gauge.store(value, Ordering::Relaxed);
            return;
        }
        drop(gauges);

        self.gauges
            .write()
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .store(value, Ordering::Relaxed);
    }

    /// Get gauge value.
    pub fn gauge_get(&self, name: &str) -> u64 {
        self.gauges
            .read()
            .get(name)
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Export metrics in Prometheus text format, sorted by name.
    pub fn export_prometheus(&self) -> String {
        let mut lines: Vec<(String, &str, u64)> = Vec::new();
        for (name, value) in self.counters.read().iter() {
            lines.push((name.clone(), "counter", value.load(Ordering::Relaxed)));
        }
        for (name, value) in self.gauges.read().iter() {
            lines.push((name.clone(), "gauge", value.load(Ordering::Relaxed)));
        }
        lines.sort();

        let mut output = String::new();
        for (name, kind, value) in lines {
            let prometheus_name = name.replace('.', "_");
            output.push_str(&format!(
                "# TYPE {prometheus_name} {kind}\n{prometheus_name} {value}\n"
            ));
        }
        output
    }
}
