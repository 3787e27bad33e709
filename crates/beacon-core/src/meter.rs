//! Instrument factory and the in-process Prometheus meter.
//!
//! [`Meter`] is the seam callers program against: given a name and options it
//! returns an instrument handle. [`PrometheusMeter`] keeps every instrument it
//! created in its own table and renders them on demand. It is an ordinary
//! value, so whoever owns it owns the report; there is no process-wide table.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::Result;
use crate::metrics::{
    Aggregation, Counter, Gauge, Histogram, HistogramOptions, MetricOptions, PromCounter,
    PromCumulativeHistogram, PromGauge, PrometheusInstrument, UpDownCounter,
};

/// Pluggable metric-creation factory.
pub trait Meter: Send + Sync {
    fn create_counter(&self, name: &str, options: MetricOptions) -> Arc<dyn Counter>;
    fn create_up_down_counter(&self, name: &str, options: MetricOptions) -> Arc<dyn UpDownCounter>;
    fn create_gauge(&self, name: &str, options: MetricOptions) -> Arc<dyn Gauge>;
    /// Fails when the bucket descriptors are invalid.
    fn create_histogram(&self, name: &str, options: HistogramOptions) -> Result<Arc<dyn Histogram>>;
}

#[derive(Default)]
pub struct PrometheusMeter {
    aggregation: Aggregation,
    instruments: DashMap<String, Arc<dyn PrometheusInstrument>>,
}

impl PrometheusMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregation(aggregation: Aggregation) -> Self {
        Self { aggregation, instruments: DashMap::new() }
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Number of registered instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    fn register(&self, kind: &str, name: &str, instrument: Arc<dyn PrometheusInstrument>) {
        let key = format!("{kind}:{name}");
        if self.instruments.insert(key.clone(), instrument).is_some() {
            tracing::warn!(instrument = %key, "instrument re-registered; previous series discarded");
        } else {
            tracing::debug!(instrument = %key, "instrument registered");
        }
    }

    /// Render every instrument with observations, ordered by `"<kind>:<name>"`.
    pub fn report(&self) -> String {
        let mut entries: Vec<(String, Arc<dyn PrometheusInstrument>)> = self
            .instruments
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        entries
            .iter()
            .filter_map(|(_, instrument)| instrument.report())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Meter for PrometheusMeter {
    fn create_counter(&self, name: &str, options: MetricOptions) -> Arc<dyn Counter> {
        let counter = Arc::new(PromCounter::monotonic(name, options, self.aggregation));
        self.register("counter", name, counter.clone());
        counter
    }

    fn create_up_down_counter(&self, name: &str, options: MetricOptions) -> Arc<dyn UpDownCounter> {
        let counter = Arc::new(PromCounter::up_down(name, options, self.aggregation));
        self.register("up-down-counter", name, counter.clone());
        counter
    }

    fn create_gauge(&self, name: &str, options: MetricOptions) -> Arc<dyn Gauge> {
        let gauge = Arc::new(PromGauge::new(name, options, self.aggregation));
        self.register("gauge", name, gauge.clone());
        gauge
    }

    fn create_histogram(&self, name: &str, options: HistogramOptions) -> Result<Arc<dyn Histogram>> {
        let histogram = Arc::new(PromCumulativeHistogram::new(name, options)?);
        self.register("histogram", name, histogram.clone());
        Ok(histogram)
    }
}
