//! Standard application observer.
//!
//! Wires the in-process meter, the app-prefixed metrics façade, the
//! instruments declared in config, the exceptions fan-out and (when
//! configured) the event filter. Build it once at startup and pass it to
//! whatever needs to record or report; there is no global instance.

use std::sync::Arc;

use beacon_core::clock::{Clock, MonotonicClock};
use beacon_core::error::Result;
use beacon_core::{Meter, PrometheusMeter};

use crate::config::{AppInfo, ObserverConfig};
use crate::exceptions::{ExceptionWriter, ExceptionsObserver, LogWriter, MetricsWriter};
use crate::obs::{AppInstruments, MetricsObserver};
use crate::policy::EventFilter;

pub struct StandardAppObserver {
    app: AppInfo,
    meter: Arc<PrometheusMeter>,
    metrics: MetricsObserver,
    instruments: AppInstruments,
    exceptions: ExceptionsObserver,
    event_filter: Option<EventFilter>,
}

impl StandardAppObserver {
    /// Build the observer.
    /// Returns Result so invalid instrument declarations stop startup.
    pub fn new(cfg: ObserverConfig) -> Result<Self> {
        Self::with_clock(cfg, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(cfg: ObserverConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        // 1) Meter + naming façade
        let meter = Arc::new(PrometheusMeter::with_aggregation(cfg.metrics.aggregation()));
        let metrics = MetricsObserver::new(meter.clone() as Arc<dyn Meter>, cfg.app.name.clone());

        // 2) Declared instruments (bucket validation happens here)
        let instruments = AppInstruments::build(&metrics, &cfg.instruments)?;

        // 3) Exceptions fan-out
        let writers: Vec<Arc<dyn ExceptionWriter>> = vec![
            Arc::new(LogWriter) as Arc<dyn ExceptionWriter>,
            Arc::new(MetricsWriter::new(&metrics)),
        ];
        let exceptions = ExceptionsObserver::new(writers);

        // 4) Admission control
        let event_filter = match &cfg.sampling {
            Some(s) if s.enabled => Some(EventFilter::new(s, &metrics, clock)),
            _ => None,
        };

        tracing::info!(
            app = %cfg.app.name,
            version = %cfg.app.version,
            environment = %cfg.app.environment,
            instruments = meter.len(),
            sampling = event_filter.is_some(),
            "observer initialized"
        );

        Ok(Self {
            app: cfg.app,
            meter,
            metrics,
            instruments,
            exceptions,
            event_filter,
        })
    }

    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    pub fn metrics(&self) -> &MetricsObserver {
        &self.metrics
    }

    pub fn meter(&self) -> Arc<PrometheusMeter> {
        Arc::clone(&self.meter)
    }

    pub fn instruments(&self) -> &AppInstruments {
        &self.instruments
    }

    pub fn exceptions(&self) -> &ExceptionsObserver {
        &self.exceptions
    }

    pub fn event_filter(&self) -> Option<&EventFilter> {
        self.event_filter.as_ref()
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn report(&self) -> String {
        self.meter.report()
    }
}
