//! Cumulative histogram with configurable, non-overlapping buckets.
//!
//! A bucket covers `(lower, upper]`. Each observation increments at most one
//! bucket; exposition turns the per-bucket counts into cumulative `le` series.
//! Values outside the configured coverage are dropped without error.

use dashmap::DashMap;
use serde::Deserialize;

use super::{header, HistogramOptions, Histogram, PrometheusInstrument};
use crate::error::{BeaconError, Result};
use crate::labels::{canonicalize, normalize_name, series};

/// One bucket: exposition label plus `[lower_exclusive, upper_inclusive]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketDescriptor {
    pub label: String,
    pub range: [f64; 2],
}

impl BucketDescriptor {
    pub fn new(label: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self { label: label.into(), range: [lower, upper] }
    }

    pub fn lower(&self) -> f64 {
        self.range[0]
    }

    pub fn upper(&self) -> f64 {
        self.range[1]
    }

    fn matches(&self, value: f64) -> bool {
        self.lower() < value && value <= self.upper()
    }
}

const DEFAULT_EDGES: [f64; 15] = [
    0.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0, 250.0, 500.0, 750.0, 1000.0, 2500.0, 5000.0, 7500.0, 10000.0,
];

/// `(-inf,0]`, `(0,5]`, ... `(7500,10000]`, `(10000,+inf)`, labeled by upper edge.
pub fn default_buckets() -> Vec<BucketDescriptor> {
    let mut out = Vec::with_capacity(DEFAULT_EDGES.len() + 1);
    let mut lower = f64::NEG_INFINITY;
    for upper in DEFAULT_EDGES {
        out.push(BucketDescriptor::new(upper.to_string(), lower, upper));
        lower = upper;
    }
    out.push(BucketDescriptor::new("+Inf", lower, f64::INFINITY));
    out
}

/// Sort descriptors by lower edge and reject empty or overlapping ranges.
///
/// Gaps between consecutive buckets are allowed.
pub fn sort_and_validate(mut descriptors: Vec<BucketDescriptor>) -> Result<Vec<BucketDescriptor>> {
    if descriptors.is_empty() {
        return Err(BeaconError::InvalidBucket("no bucket descriptors".into()));
    }
    for d in &descriptors {
        // `!(a < b)` also rejects NaN edges
        if !(d.lower() < d.upper()) {
            return Err(BeaconError::InvalidBucket(format!(
                "bucket {:?} has empty range ({}, {}]",
                d.label,
                d.lower(),
                d.upper()
            )));
        }
    }

    descriptors.sort_by(|a, b| a.lower().total_cmp(&b.lower()));

    for pair in descriptors.windows(2) {
        if pair[1].lower() < pair[0].upper() {
            return Err(BeaconError::InvalidBucket(format!(
                "bucket {:?} overlaps bucket {:?}",
                pair[1].label, pair[0].label
            )));
        }
    }
    Ok(descriptors)
}

#[derive(Debug, Clone)]
struct Distribution {
    count: u64,
    sum: f64,
    buckets: Vec<u64>,
}

pub struct PromCumulativeHistogram {
    name: String,
    description: Option<String>,
    descriptors: Vec<BucketDescriptor>,
    distributions: DashMap<String, Distribution>,
}

impl PromCumulativeHistogram {
    pub fn new(name: &str, options: HistogramOptions) -> Result<Self> {
        let descriptors = sort_and_validate(options.bucket_descriptors.unwrap_or_else(default_buckets))?;
        Ok(Self {
            name: normalize_name(name, Some("_distribution")),
            description: options.description,
            descriptors,
            distributions: DashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buckets(&self) -> &[BucketDescriptor] {
        &self.descriptors
    }

    /// `(count, sum)` for a label set.
    pub fn totals(&self, labels: &[(&str, &str)]) -> Option<(u64, f64)> {
        let key = canonicalize(labels.iter().copied());
        self.distributions.get(&key).map(|d| (d.count, d.sum))
    }

    /// Raw (non-cumulative) per-bucket counts, in bucket order.
    pub fn bucket_counts(&self, labels: &[(&str, &str)]) -> Option<Vec<u64>> {
        let key = canonicalize(labels.iter().copied());
        self.distributions.get(&key).map(|d| d.buckets.clone())
    }
}

impl Histogram for PromCumulativeHistogram {
    fn record(&self, value: f64, labels: &[(&str, &str)]) {
        let Some(idx) = self.descriptors.iter().position(|d| d.matches(value)) else {
            tracing::trace!(metric = %self.name, value, "value outside bucket coverage; dropped");
            return;
        };

        let key = canonicalize(labels.iter().copied());
        let n = self.descriptors.len();
        let mut dist = self.distributions.entry(key).or_insert_with(|| Distribution {
            count: 0,
            sum: 0.0,
            buckets: vec![0; n],
        });
        dist.buckets[idx] += 1;
        dist.count += 1;
        dist.sum += value;
    }
}

impl PrometheusInstrument for PromCumulativeHistogram {
    fn report(&self) -> Option<String> {
        if self.distributions.is_empty() {
            return None;
        }

        let mut rows: Vec<(String, Distribution)> = self
            .distributions
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = header(&self.name, self.description.as_deref(), "histogram");
        for (key, dist) in &rows {
            out.push(format!("{} {}", series(&format!("{}_count", self.name), key), dist.count));
            out.push(format!("{} {}", series(&format!("{}_sum", self.name), key), dist.sum));

            let prefix = if key.is_empty() { String::new() } else { format!("{key},") };
            let mut cumulative = 0u64;
            for (descriptor, count) in self.descriptors.iter().zip(&dist.buckets) {
                cumulative += count;
                out.push(format!(
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    self.name, prefix, descriptor.label, cumulative
                ));
            }
        }
        Some(out.join("\n"))
    }
}
