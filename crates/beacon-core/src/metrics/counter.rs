use dashmap::DashMap;

use super::{accumulate, render_scalar, Aggregation, Counter, MetricOptions, PrometheusInstrument, UpDownCounter};
use crate::error::{BeaconError, Result};
use crate::labels::{canonicalize, normalize_name};

/// Running-sum counter.
///
/// One type serves both counter kinds: `allow_negative` is off for plain
/// counters (negative deltas are rejected) and on for up/down counters.
/// Names are normalized and carry the `_total` suffix either way.
pub struct PromCounter {
    name: String,
    options: MetricOptions,
    allow_negative: bool,
    aggregation: Aggregation,
    values: DashMap<String, f64>,
}

impl PromCounter {
    pub fn monotonic(name: &str, options: MetricOptions, aggregation: Aggregation) -> Self {
        Self::build(name, options, false, aggregation)
    }

    pub fn up_down(name: &str, options: MetricOptions, aggregation: Aggregation) -> Self {
        Self::build(name, options, true, aggregation)
    }

    fn build(name: &str, options: MetricOptions, allow_negative: bool, aggregation: Aggregation) -> Self {
        Self {
            name: normalize_name(name, Some("_total")),
            options,
            allow_negative,
            aggregation,
            values: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value for a label set, if it was ever observed.
    pub fn value(&self, labels: &[(&str, &str)]) -> Option<f64> {
        let key = canonicalize(labels.iter().copied());
        self.values.get(&key).map(|v| *v)
    }

    fn apply(&self, value: f64, labels: &[(&str, &str)]) -> Result<()> {
        // `!(v >= 0)` also rejects NaN
        if !self.allow_negative && !(value >= 0.0) {
            return Err(BeaconError::InvalidValue(format!(
                "{}: counter increments must be non-negative, got {value}",
                self.name
            )));
        }
        let key = canonicalize(labels.iter().copied());
        accumulate(&self.values, key, value, self.aggregation);
        Ok(())
    }
}

impl Counter for PromCounter {
    fn add(&self, value: f64, labels: &[(&str, &str)]) -> Result<()> {
        self.apply(value, labels)
    }
}

impl UpDownCounter for PromCounter {
    fn add(&self, value: f64, labels: &[(&str, &str)]) {
        // only fails for a monotonic counter driven through this trait
        if let Err(e) = self.apply(value, labels) {
            tracing::warn!(metric = %self.name, error = %e, "up/down add rejected");
        }
    }
}

impl PrometheusInstrument for PromCounter {
    fn report(&self) -> Option<String> {
        render_scalar(&self.name, self.options.description.as_deref(), "counter", &self.values)
    }
}
