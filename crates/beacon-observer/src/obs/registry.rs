//! Instrument registries.
//!
//! A registry is built once from a declarative config (instrument id ->
//! label + options) and afterwards addressed by id. Ids that were never
//! declared are ignored, so a typo costs a series, not an outage.

use std::collections::HashMap;
use std::sync::Arc;

use beacon_core::error::Result;
use beacon_core::metrics::{Counter, Gauge, Histogram, HistogramOptions, MetricOptions, UpDownCounter};

use super::MetricsObserver;
use crate::config::{HistogramInstrumentsConfig, InstrumentsConfig, InstrumentsSection};

fn scoped(scope: Option<&str>, label: &str) -> String {
    match scope {
        Some(s) => format!("{s}_{label}"),
        None => label.to_string(),
    }
}

fn unknown(kind: &str, id: &str) {
    tracing::trace!(kind, id, "unregistered instrument id; ignored");
}

pub struct CounterRegistry {
    counters: HashMap<String, Arc<dyn Counter>>,
}

impl CounterRegistry {
    pub fn new<F>(create: F, config: &InstrumentsConfig, scope: Option<&str>) -> Self
    where
        F: Fn(&str, MetricOptions) -> Arc<dyn Counter>,
    {
        let counters = config
            .iter()
            .map(|(id, c)| (id.clone(), create(&scoped(scope, &c.label), c.options.clone())))
            .collect();
        Self { counters }
    }

    pub fn increment(&self, id: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.add(id, 1.0, labels)
    }

    /// Fails only for a negative `value`.
    pub fn add(&self, id: &str, value: f64, labels: &[(&str, &str)]) -> Result<()> {
        match self.counters.get(id) {
            Some(c) => c.add(value, labels),
            None => {
                unknown("counter", id);
                Ok(())
            }
        }
    }
}

pub struct UpDownCounterRegistry {
    counters: HashMap<String, Arc<dyn UpDownCounter>>,
}

impl UpDownCounterRegistry {
    pub fn new<F>(create: F, config: &InstrumentsConfig, scope: Option<&str>) -> Self
    where
        F: Fn(&str, MetricOptions) -> Arc<dyn UpDownCounter>,
    {
        let counters = config
            .iter()
            .map(|(id, c)| (id.clone(), create(&scoped(scope, &c.label), c.options.clone())))
            .collect();
        Self { counters }
    }

    pub fn increment(&self, id: &str, labels: &[(&str, &str)]) {
        self.add(id, 1.0, labels);
    }

    pub fn decrement(&self, id: &str, labels: &[(&str, &str)]) {
        self.add(id, -1.0, labels);
    }

    pub fn add(&self, id: &str, value: f64, labels: &[(&str, &str)]) {
        match self.counters.get(id) {
            Some(c) => c.add(value, labels),
            None => unknown("up-down-counter", id),
        }
    }

    pub fn sub(&self, id: &str, value: f64, labels: &[(&str, &str)]) {
        self.add(id, -value, labels);
    }
}

pub struct GaugeRegistry {
    gauges: HashMap<String, Arc<dyn Gauge>>,
}

impl GaugeRegistry {
    pub fn new<F>(create: F, config: &InstrumentsConfig, scope: Option<&str>) -> Self
    where
        F: Fn(&str, MetricOptions) -> Arc<dyn Gauge>,
    {
        let gauges = config
            .iter()
            .map(|(id, c)| (id.clone(), create(&scoped(scope, &c.label), c.options.clone())))
            .collect();
        Self { gauges }
    }

    pub fn record(&self, id: &str, value: f64, labels: &[(&str, &str)]) {
        match self.gauges.get(id) {
            Some(g) => g.record(value, labels),
            None => unknown("gauge", id),
        }
    }
}

pub struct HistogramRegistry {
    histograms: HashMap<String, Arc<dyn Histogram>>,
}

impl HistogramRegistry {
    /// Fails on the first histogram whose buckets do not validate.
    pub fn new<F>(create: F, config: &HistogramInstrumentsConfig, scope: Option<&str>) -> Result<Self>
    where
        F: Fn(&str, HistogramOptions) -> Result<Arc<dyn Histogram>>,
    {
        let mut histograms = HashMap::with_capacity(config.len());
        for (id, c) in config {
            histograms.insert(id.clone(), create(&scoped(scope, &c.label), c.options.clone())?);
        }
        Ok(Self { histograms })
    }

    pub fn record(&self, id: &str, value: f64, labels: &[(&str, &str)]) {
        match self.histograms.get(id) {
            Some(h) => h.record(value, labels),
            None => unknown("histogram", id),
        }
    }
}

/// The four registries declared under `instruments:` in config.
pub struct AppInstruments {
    pub counters: CounterRegistry,
    pub up_down_counters: UpDownCounterRegistry,
    pub gauges: GaugeRegistry,
    pub histograms: HistogramRegistry,
}

impl AppInstruments {
    pub fn build(metrics: &MetricsObserver, section: &InstrumentsSection) -> Result<Self> {
        let scope = section.scope.as_deref();
        Ok(Self {
            counters: metrics.create_counter_registry(&section.counters, scope),
            up_down_counters: metrics.create_up_down_counter_registry(&section.up_down_counters, scope),
            gauges: metrics.create_gauge_registry(&section.gauges, scope),
            histograms: metrics.create_histogram_registry(&section.histograms, scope)?,
        })
    }
}
