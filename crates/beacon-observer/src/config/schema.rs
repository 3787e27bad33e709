use std::collections::BTreeMap;

use serde::Deserialize;

use beacon_core::error::{BeaconError, Result};
use beacon_core::metrics::{Aggregation, HistogramOptions, MetricOptions};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserverConfig {
    pub version: u32,

    pub app: AppInfo,

    /// Absent => no event filter / trace sampler is built.
    #[serde(default)]
    pub sampling: Option<SamplingConfig>,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub instruments: InstrumentsSection,
}

impl ObserverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BeaconError::UnsupportedVersion);
        }
        self.app.validate()?;
        if let Some(sampling) = &self.sampling {
            sampling.validate()?;
        }
        self.instruments.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppInfo {
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,

    #[serde(default = "default_environment")]
    pub environment: String,
}

impl AppInfo {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BeaconError::InvalidConfig("app.name must not be empty".into()));
        }
        Ok(())
    }
}

fn default_app_version() -> String {
    "0.0.0".into()
}
fn default_environment() -> String {
    "development".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Forwarded untouched to the tracing backend.
    #[serde(default)]
    pub profiles_sample_rate: f64,

    /// Multiplied into every trace sampling decision.
    #[serde(default = "default_rate")]
    pub base_tracing_rate: f64,

    /// Extra down-scaling for chatty operations, on top of their fixed 10%.
    #[serde(default = "default_rate")]
    pub chatty_sample_rate_scaler: f64,

    /// Minimum time between two sampled chatty operations with the same name.
    #[serde(default = "default_chatty_min_time_ms")]
    pub chatty_op_rate_min_time_ms: u64,

    #[serde(default = "default_chatty_op_types")]
    pub chatty_op_types: Vec<String>,

    /// Attribute carrying the operation type on a sampling context.
    #[serde(default = "default_op_attribute")]
    pub op_attribute: String,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            profiles_sample_rate: 0.0,
            base_tracing_rate: default_rate(),
            chatty_sample_rate_scaler: default_rate(),
            chatty_op_rate_min_time_ms: default_chatty_min_time_ms(),
            chatty_op_types: default_chatty_op_types(),
            op_attribute: default_op_attribute(),
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.profiles_sample_rate) {
            return Err(BeaconError::InvalidConfig(
                "sampling.profiles_sample_rate must be between 0 and 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.base_tracing_rate) {
            return Err(BeaconError::InvalidConfig(
                "sampling.base_tracing_rate must be between 0 and 1".into(),
            ));
        }
        if !(0.0..=10.0).contains(&self.chatty_sample_rate_scaler) {
            return Err(BeaconError::InvalidConfig(
                "sampling.chatty_sample_rate_scaler must be between 0 and 10".into(),
            ));
        }
        if self.chatty_op_rate_min_time_ms == 0 {
            return Err(BeaconError::InvalidConfig(
                "sampling.chatty_op_rate_min_time_ms must be greater than 0".into(),
            ));
        }
        if self.op_attribute.is_empty() {
            return Err(BeaconError::InvalidConfig("sampling.op_attribute must not be empty".into()));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_rate() -> f64 {
    1.0
}
fn default_chatty_min_time_ms() -> u64 {
    1000
}
fn default_chatty_op_types() -> Vec<String> {
    vec!["topic.process".into()]
}
fn default_op_attribute() -> String {
    "sentry.op".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Reproduce the seed-to-1 aggregation of older reports.
    #[serde(default)]
    pub legacy_aggregation: bool,
}

impl MetricsSection {
    pub fn aggregation(&self) -> Aggregation {
        if self.legacy_aggregation {
            Aggregation::Legacy
        } else {
            Aggregation::Standard
        }
    }
}

/// Declaration of one scalar instrument.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentConfig {
    pub label: String,
    #[serde(default)]
    pub options: MetricOptions,
}

impl InstrumentConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), options: MetricOptions::default() }
    }

    pub fn described(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            options: MetricOptions { description: Some(description.into()) },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramInstrumentConfig {
    pub label: String,
    #[serde(default)]
    pub options: HistogramOptions,
}

/// Instrument id -> declaration.
pub type InstrumentsConfig = BTreeMap<String, InstrumentConfig>;
pub type HistogramInstrumentsConfig = BTreeMap<String, HistogramInstrumentConfig>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentsSection {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub counters: InstrumentsConfig,
    #[serde(default)]
    pub up_down_counters: InstrumentsConfig,
    #[serde(default)]
    pub gauges: InstrumentsConfig,
    #[serde(default)]
    pub histograms: HistogramInstrumentsConfig,
}

impl InstrumentsSection {
    pub fn validate(&self) -> Result<()> {
        let scalar = self
            .counters
            .iter()
            .chain(&self.up_down_counters)
            .chain(&self.gauges)
            .map(|(id, c)| (id, c.label.as_str()));
        let hist = self.histograms.iter().map(|(id, c)| (id, c.label.as_str()));
        for (id, label) in scalar.chain(hist) {
            if label.is_empty() {
                return Err(BeaconError::InvalidConfig(format!(
                    "instruments.{id}.label must not be empty"
                )));
            }
        }
        Ok(())
    }
}
