use std::sync::Arc;

use beacon_core::error::Result;
use beacon_core::metrics::{Counter, Gauge, Histogram, HistogramOptions, MetricOptions, UpDownCounter};
use beacon_core::Meter;

use super::registry::{CounterRegistry, GaugeRegistry, HistogramRegistry, UpDownCounterRegistry};
use crate::config::{HistogramInstrumentsConfig, InstrumentsConfig};

/// Prefixes every instrument with the application name before handing the
/// request to the underlying meter.
#[derive(Clone)]
pub struct MetricsObserver {
    meter: Arc<dyn Meter>,
    name: String,
}

impl MetricsObserver {
    pub fn new(meter: Arc<dyn Meter>, name: impl Into<String>) -> Self {
        Self { meter, name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn qualify(&self, name: &str) -> String {
        format!("{}_{}", self.name, name)
    }

    pub fn create_counter(&self, name: &str, options: MetricOptions) -> Arc<dyn Counter> {
        self.meter.create_counter(&self.qualify(name), options)
    }

    pub fn create_up_down_counter(&self, name: &str, options: MetricOptions) -> Arc<dyn UpDownCounter> {
        self.meter.create_up_down_counter(&self.qualify(name), options)
    }

    pub fn create_gauge(&self, name: &str, options: MetricOptions) -> Arc<dyn Gauge> {
        self.meter.create_gauge(&self.qualify(name), options)
    }

    pub fn create_histogram(&self, name: &str, options: HistogramOptions) -> Result<Arc<dyn Histogram>> {
        self.meter.create_histogram(&self.qualify(name), options)
    }

    pub fn create_counter_registry(&self, config: &InstrumentsConfig, scope: Option<&str>) -> CounterRegistry {
        CounterRegistry::new(|n, o| self.create_counter(n, o), config, scope)
    }

    pub fn create_up_down_counter_registry(
        &self,
        config: &InstrumentsConfig,
        scope: Option<&str>,
    ) -> UpDownCounterRegistry {
        UpDownCounterRegistry::new(|n, o| self.create_up_down_counter(n, o), config, scope)
    }

    pub fn create_gauge_registry(&self, config: &InstrumentsConfig, scope: Option<&str>) -> GaugeRegistry {
        GaugeRegistry::new(|n, o| self.create_gauge(n, o), config, scope)
    }

    pub fn create_histogram_registry(
        &self,
        config: &HistogramInstrumentsConfig,
        scope: Option<&str>,
    ) -> Result<HistogramRegistry> {
        HistogramRegistry::new(|n, o| self.create_histogram(n, o), config, scope)
    }
}
