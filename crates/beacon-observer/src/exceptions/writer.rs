use std::collections::BTreeMap;
use std::error::Error as StdError;

use super::{ExceptionWriter, InvariantException, Metadata};
use crate::config::InstrumentConfig;
use crate::obs::{CounterRegistry, MetricsObserver};

fn metadata_json(metadata: &Metadata) -> String {
    serde_json::to_string(metadata).unwrap_or_else(|_| "{}".into())
}

/// Writes captures as structured `tracing` events under the `observer` target.
#[derive(Debug, Default)]
pub struct LogWriter;

impl ExceptionWriter for LogWriter {
    fn write_exception(&self, error: &(dyn StdError + 'static), breadcrumb: &str, metadata: &Metadata) {
        tracing::warn!(
            target: "observer",
            breadcrumb,
            metadata = %metadata_json(metadata),
            error = %error,
            "ExceptionCaptured"
        );
    }

    fn write_invariant_exception(&self, exception: &InvariantException, metadata: &Metadata) {
        tracing::error!(
            target: "observer",
            invariant_code = exception.code(),
            metadata = %metadata_json(metadata),
            "Invariant: {}: {}",
            exception.code(),
            exception.message()
        );
    }
}

const EXCEPTION_CAPTURED: &str = "exceptionCaptured";
const INVARIANT_TRIGGERED: &str = "invariantTriggered";

/// Counts captures, labeled by breadcrumb / invariant code plus metadata.
pub struct MetricsWriter {
    counters: CounterRegistry,
}

impl MetricsWriter {
    pub fn new(metrics: &MetricsObserver) -> Self {
        let mut declared = BTreeMap::new();
        declared.insert(EXCEPTION_CAPTURED.to_string(), InstrumentConfig::new("exception_captured"));
        declared.insert(INVARIANT_TRIGGERED.to_string(), InstrumentConfig::new("invariant_triggered"));
        Self { counters: metrics.create_counter_registry(&declared, Some("observer")) }
    }

    fn bump(&self, id: &str, first: (&str, &str), metadata: &Metadata) {
        let mut labels: Vec<(&str, &str)> = vec![first];
        labels.extend(metadata.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Err(e) = self.counters.increment(id, &labels) {
            tracing::warn!(error = %e, "exception counter update failed");
        }
    }
}

impl ExceptionWriter for MetricsWriter {
    fn write_exception(&self, _error: &(dyn StdError + 'static), breadcrumb: &str, metadata: &Metadata) {
        self.bump(EXCEPTION_CAPTURED, ("breadcrumb", breadcrumb), metadata);
    }

    fn write_invariant_exception(&self, exception: &InvariantException, metadata: &Metadata) {
        self.bump(INVARIANT_TRIGGERED, ("invariantCode", exception.code()), metadata);
    }
}
