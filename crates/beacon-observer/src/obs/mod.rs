//! Application-facing metrics: the naming façade over a `Meter` and the
//! registries that map instrument ids to handles.

pub mod metrics_observer;
pub mod registry;

pub use metrics_observer::MetricsObserver;
pub use registry::{AppInstruments, CounterRegistry, GaugeRegistry, HistogramRegistry, UpDownCounterRegistry};
