//! Exception capture fan-out.
//!
//! An [`ExceptionsObserver`] hands every captured error to each configured
//! [`ExceptionWriter`]; writers decide what "capturing" means (a log line,
//! a counter bump, a call into an external reporter).

pub mod writer;

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

pub use writer::{LogWriter, MetricsWriter};

/// Free-form tags attached to a capture.
pub type Metadata = BTreeMap<String, String>;

/// A violated internal invariant, identified by a stable code.
#[derive(Debug, Clone, Error)]
#[error("{code}:{message}")]
pub struct InvariantException {
    code: String,
    message: String,
}

impl InvariantException {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub trait ExceptionWriter: Send + Sync {
    fn write_exception(&self, error: &(dyn StdError + 'static), breadcrumb: &str, metadata: &Metadata);
    fn write_invariant_exception(&self, exception: &InvariantException, metadata: &Metadata);
}

#[derive(Clone, Default)]
pub struct ExceptionsObserver {
    writers: Vec<Arc<dyn ExceptionWriter>>,
}

impl ExceptionsObserver {
    pub fn new(writers: Vec<Arc<dyn ExceptionWriter>>) -> Self {
        Self { writers }
    }

    pub fn capture_exception(&self, error: &(dyn StdError + 'static), breadcrumb: &str, metadata: &Metadata) {
        for w in &self.writers {
            w.write_exception(error, breadcrumb, metadata);
        }
    }

    pub fn capture_invariant_exception(&self, exception: &InvariantException, metadata: &Metadata) {
        for w in &self.writers {
            w.write_invariant_exception(exception, metadata);
        }
    }
}
