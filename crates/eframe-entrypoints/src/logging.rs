//! Logging setup
//!
//! Installs a `tracing` fmt subscriber filtered by `RUST_LOG`. When the
//! variable is not set a default filter is used that keeps the noisy UI and
//! tile-fetching crates quiet.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,eframe::native=warn,egui::context=warn,walkers=info,hyper_util=info,reqwest::connect=info"
    } else {
        "info,eframe=warn,egui::context=warn"
    }
}

/// Build the filter from `RUST_LOG`, falling back to [`default_filter`]
pub fn env_filter() -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default_filter()),
    }
}

/// Initialize the global tracing subscriber.
///
/// Calling this more than once keeps the first subscriber.
pub fn setup_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(env_filter());
    let registry = tracing_subscriber::registry().with(fmt_layer);
    if registry.try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
        return;
    }

    if cfg!(feature = "profiling") {
        tracing::info!("Logging initialized (profiling scopes reported as tracing spans)");
    } else {
        tracing::info!("Logging initialized");
    }
}
