//! Hooks the external capture pipeline calls before sending.

use std::collections::BTreeMap;
use std::sync::Arc;

use beacon_core::clock::Clock;
use beacon_core::error::Result;

use super::engine::SamplingController;
use super::traces::SamplingContext;
use crate::config::{InstrumentConfig, SamplingConfig};
use crate::obs::{CounterRegistry, MetricsObserver};

/// An outbound error event, as far as admission cares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub message: Option<String>,
    pub breadcrumbs: Vec<String>,
}

/// Side information captured with the event.
#[derive(Debug, Clone, Default)]
pub struct EventHint {
    pub synthetic_exception_message: Option<String>,
}

const EVENT_DROPPED: &str = "eventDropped";
const EVENT_PUBLISHED: &str = "eventPublished";

pub struct EventFilter {
    controller: SamplingController,
    counters: CounterRegistry,
    base_tracing_rate: f64,
}

impl EventFilter {
    pub fn new(cfg: &SamplingConfig, metrics: &MetricsObserver, clock: Arc<dyn Clock>) -> Self {
        let mut declared = BTreeMap::new();
        declared.insert(EVENT_DROPPED.to_string(), InstrumentConfig::new("sentry_event_dropped"));
        declared.insert(EVENT_PUBLISHED.to_string(), InstrumentConfig::new("sentry_event_published"));

        tracing::debug!(
            profiles_sample_rate = cfg.profiles_sample_rate,
            base_tracing_rate = cfg.base_tracing_rate,
            "initializing event filter"
        );

        Self {
            controller: SamplingController::with_clock(cfg, clock),
            counters: metrics.create_counter_registry(&declared, Some("observer")),
            base_tracing_rate: cfg.base_tracing_rate,
        }
    }

    pub fn controller(&self) -> &SamplingController {
        &self.controller
    }

    /// Throttling key: synthetic exception message, then event message, then
    /// the breadcrumbs joined by `,`.
    pub fn event_key(event: &Event, hint: &EventHint) -> String {
        if let Some(m) = &hint.synthetic_exception_message {
            return m.clone();
        }
        if let Some(m) = &event.message {
            return m.clone();
        }
        if !event.breadcrumbs.is_empty() {
            return event.breadcrumbs.join(",");
        }
        "undefined".to_string()
    }

    /// `None` drops the event.
    pub fn before_send(&self, event: Event, hint: &EventHint) -> Option<Event> {
        let key = Self::event_key(&event, hint);

        if self.controller.should_drop_event(&key) {
            tracing::warn!(event_id = %event.event_id, key = %key, "throttling event");
            self.count(EVENT_DROPPED, &key);
            return None;
        }

        self.count(EVENT_PUBLISHED, &key);
        Some(event)
    }

    /// Final sampling probability for a transaction.
    pub fn traces_sampler(&self, ctx: &SamplingContext) -> f64 {
        (self.controller.trace_sample_rate(ctx) * self.base_tracing_rate).clamp(0.0, 1.0)
    }

    fn count(&self, id: &str, key: &str) {
        let res: Result<()> = self.counters.increment(id, &[("key", key)]);
        if let Err(e) = res {
            tracing::warn!(error = %e, "event counter update failed");
        }
    }
}
