//! beacon observer library entry.
//!
//! This crate wires the core primitives into an application observer:
//! strict YAML config, instrument registries, the exceptions fan-out, and
//! the sampling controller consulted by an external trace/event pipeline.
//! It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app;
pub mod config;
pub mod exceptions;
pub mod obs;
pub mod policy;

pub use app::StandardAppObserver;
