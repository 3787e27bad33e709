use dashmap::DashMap;

use super::{accumulate, render_scalar, Aggregation, Gauge, MetricOptions, PrometheusInstrument};
use crate::labels::{canonicalize, normalize_name};

/// Last-value gauge.
pub struct PromGauge {
    name: String,
    options: MetricOptions,
    aggregation: Aggregation,
    values: DashMap<String, f64>,
}

impl PromGauge {
    pub fn new(name: &str, options: MetricOptions, aggregation: Aggregation) -> Self {
        Self {
            name: normalize_name(name, None),
            options,
            aggregation,
            values: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self, labels: &[(&str, &str)]) -> Option<f64> {
        let key = canonicalize(labels.iter().copied());
        self.values.get(&key).map(|v| *v)
    }
}

impl Gauge for PromGauge {
    fn record(&self, value: f64, labels: &[(&str, &str)]) {
        let key = canonicalize(labels.iter().copied());
        match self.aggregation {
            Aggregation::Standard => {
                self.values.insert(key, value);
            }
            Aggregation::Legacy => accumulate(&self.values, key, value, self.aggregation),
        }
    }
}

impl PrometheusInstrument for PromGauge {
    fn report(&self) -> Option<String> {
        render_scalar(&self.name, self.options.description.as_deref(), "gauge", &self.values)
    }
}
