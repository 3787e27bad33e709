//! Top-level facade crate for beacon.
//!
//! Re-exports the core primitives and the observer wiring so users can depend on a single crate.

pub mod core {
    pub use beacon_core::*;
}

pub mod observer {
    pub use beacon_observer::*;
}
