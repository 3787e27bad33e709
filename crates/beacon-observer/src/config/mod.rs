//! Observer config loader (strict parsing).

pub mod schema;

use std::fs;

use beacon_core::error::{BeaconError, Result};

pub use schema::{
    AppInfo, HistogramInstrumentConfig, HistogramInstrumentsConfig, InstrumentConfig,
    InstrumentsConfig, InstrumentsSection, MetricsSection, ObserverConfig, SamplingConfig,
};

pub fn load_from_file(path: &str) -> Result<ObserverConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BeaconError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ObserverConfig> {
    let cfg: ObserverConfig = serde_yaml::from_str(s)
        .map_err(|e| BeaconError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
