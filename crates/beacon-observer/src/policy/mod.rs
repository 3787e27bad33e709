//! Admission control for the external trace/event pipeline.
//!
//! Composes the core throttling tables into two decisions: whether an error
//! event should be dropped, and at what rate a transaction should be traced.
//! The pipeline itself (capture, transport) lives outside this crate; it
//! consumes these decisions through [`EventFilter`].

pub mod engine;
pub mod events;
pub mod filter;
pub mod traces;

pub use engine::SamplingController;
pub use events::EventAdmission;
pub use filter::{Event, EventFilter, EventHint};
pub use traces::{SamplingContext, TraceSampling};
