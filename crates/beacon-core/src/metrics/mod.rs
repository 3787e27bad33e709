//! Metric primitives with dynamic labels.
//!
//! Each instrument owns a `DashMap` from canonical label key to its
//! aggregate. Instruments are created through a [`Meter`](crate::Meter) and
//! handed out behind the traits below, so callers never depend on the
//! concrete storage.

pub mod counter;
pub mod gauge;
pub mod histogram;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Deserialize;

use crate::error::Result;
use crate::labels::series;

pub use counter::PromCounter;
pub use gauge::PromGauge;
pub use histogram::{default_buckets, BucketDescriptor, PromCumulativeHistogram};

/// Options shared by every instrument kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricOptions {
    #[serde(default)]
    pub description: Option<String>,
}

/// Histogram options; `bucket_descriptors` falls back to [`default_buckets`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramOptions {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bucket_descriptors: Option<Vec<BucketDescriptor>>,
}

/// How scalar instruments fold a new observation into an existing entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregation {
    /// Counters sum from their first value; gauges keep the last value.
    #[default]
    Standard,
    /// Reproduces older reports: a new entry is seeded to `1` whatever the
    /// first value was, and gauges accumulate like counters.
    Legacy,
}

/// Monotonic counter handle.
pub trait Counter: Send + Sync {
    /// Add a non-negative value.
    fn add(&self, value: f64, labels: &[(&str, &str)]) -> Result<()>;

    fn increment(&self, labels: &[(&str, &str)]) -> Result<()> {
        self.add(1.0, labels)
    }
}

/// Counter that may go down (queue depth, in-flight requests).
pub trait UpDownCounter: Send + Sync {
    fn add(&self, value: f64, labels: &[(&str, &str)]);

    fn increment(&self, labels: &[(&str, &str)]) {
        self.add(1.0, labels);
    }

    fn decrement(&self, labels: &[(&str, &str)]) {
        self.add(-1.0, labels);
    }

    fn sub(&self, value: f64, labels: &[(&str, &str)]) {
        self.add(-value, labels);
    }
}

/// Gauge handle.
pub trait Gauge: Send + Sync {
    fn record(&self, value: f64, labels: &[(&str, &str)]);
}

/// Histogram handle.
pub trait Histogram: Send + Sync {
    fn record(&self, value: f64, labels: &[(&str, &str)]);
}

/// An instrument that can render itself in text exposition format.
pub trait PrometheusInstrument: Send + Sync {
    /// Full `# HELP`/`# TYPE`/series block, or `None` when nothing was observed.
    fn report(&self) -> Option<String>;
}

pub(crate) fn accumulate(
    values: &DashMap<String, f64>,
    key: String,
    value: f64,
    aggregation: Aggregation,
) {
    match values.entry(key) {
        Entry::Occupied(mut o) => *o.get_mut() += value,
        Entry::Vacant(v) => {
            let seed = match aggregation {
                Aggregation::Standard => value,
                Aggregation::Legacy => 1.0,
            };
            v.insert(seed);
        }
    }
}

pub(crate) fn header(name: &str, description: Option<&str>, kind: &str) -> Vec<String> {
    vec![
        format!("# HELP {} {}", name, description.unwrap_or("description missing")),
        format!("# TYPE {} {}", name, kind),
    ]
}

/// Render a scalar instrument, series sorted by canonical key.
pub(crate) fn render_scalar(
    name: &str,
    description: Option<&str>,
    kind: &str,
    values: &DashMap<String, f64>,
) -> Option<String> {
    if values.is_empty() {
        return None;
    }

    let mut rows: Vec<(String, f64)> = values
        .iter()
        .map(|r| (r.key().clone(), *r.value()))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = header(name, description, kind);
    out.extend(
        rows.iter()
            .map(|(key, value)| format!("{} {}", series(name, key), value)),
    );
    Some(out.join("\n"))
}
