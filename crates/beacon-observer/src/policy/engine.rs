use std::sync::Arc;
use std::time::Duration;

use beacon_core::clock::{Clock, MonotonicClock};

use super::events::EventAdmission;
use super::traces::{SamplingContext, TraceSampling};
use crate::config::SamplingConfig;

/// Sampling runtime compiled from [`SamplingConfig`].
/// Construct once at startup, then share via Arc.
pub struct SamplingController {
    events: EventAdmission,
    traces: TraceSampling,
    chatty_scaler: f64,
}

impl SamplingController {
    pub fn new(cfg: &SamplingConfig) -> Self {
        Self::with_clock(cfg, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(cfg: &SamplingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            events: EventAdmission::with_clock(clock.clone()),
            traces: TraceSampling::new(
                Duration::from_millis(cfg.chatty_op_rate_min_time_ms),
                cfg.chatty_op_types.iter().cloned(),
                cfg.op_attribute.clone(),
                clock,
            ),
            chatty_scaler: cfg.chatty_sample_rate_scaler,
        }
    }

    /// Event admission: true means drop.
    pub fn should_drop_event(&self, key: &str) -> bool {
        self.events.should_drop(key)
    }

    /// Trace weight before the base tracing rate is applied.
    pub fn trace_sample_rate(&self, ctx: &SamplingContext) -> f64 {
        self.traces.sample_rate(ctx, self.chatty_scaler)
    }
}
