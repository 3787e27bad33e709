//! beacon-observer
//!
//! Loads an observer config, builds every declared instrument (so bucket or
//! range mistakes surface here rather than in production), and prints the
//! exposition report.
//!
//! Usage: `beacon-observer [config.yaml]` (defaults to `beacon.yaml`).

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use beacon_observer::{config, StandardAppObserver};

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "beacon.yaml".to_string());

    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, kind = e.kind().as_str(), error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let observer = match StandardAppObserver::new(cfg) {
        Ok(o) => o,
        Err(e) => {
            tracing::error!(%path, kind = e.kind().as_str(), error = %e, "observer build failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%path, app = %observer.app().name, "config ok");
    println!("{}", observer.report());
    ExitCode::SUCCESS
}
