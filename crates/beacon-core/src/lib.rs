//! beacon core: in-process telemetry primitives and admission control.
//!
//! This crate holds the metric primitives (counter, up/down counter, gauge,
//! cumulative histogram), the label canonicalization they aggregate by, the
//! Prometheus text exposition, and the fixed-window throttler / minimum
//! interval rate limiter used to gate events. It carries no SDK or runtime
//! dependencies so it can be embedded anywhere.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Fallible paths surface as `BeaconError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod clock;
pub mod error;
pub mod labels;
pub mod meter;
pub mod metrics;
pub mod throttle;

/// Shared result type.
pub use error::{BeaconError, ErrorKind, Result};
pub use meter::{Meter, PrometheusMeter};
