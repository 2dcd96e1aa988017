//! Native entry point for egui/eframe applications
//!
//! Provides the startup sequence shared by desktop apps: logging setup, a
//! multi-threaded tokio runtime for background work, CLI parsing and version
//! logging.
//!
//! # Usage
//!
//! In your application's `lib.rs`:
//!
//! ```ignore
//! eframe_entrypoints::eframe_app!("My App Name", |cc| Box::new(MyApp::new(cc)));
//! ```
//!
//! In your `main.rs`:
//!
//! ```ignore
//! fn main() {
//!     my_app::run_native();
//! }
//! ```

pub mod async_runtime;
pub mod cli;
pub mod logging;
mod metadata;

pub use cli::parse_args;
pub use logging::setup_logging;
pub use metadata::{AppInfo, log_version_info, short_version_info};

// Re-exports used by the generated entry point
pub use eframe;
pub use eframe::CreationContext;
pub use tokio;

/// Define the native entry point of an eframe application.
///
/// # Arguments
///
/// * `$app_name` - Window title and name used in logs
/// * `$app_creator` - A closure that takes `&CreationContext` and returns `Box<dyn eframe::App>`
///
/// Generates `pub fn run_native()`, to be called from `main.rs`. The package
/// name and version of the calling crate are logged at startup.
#[macro_export]
macro_rules! eframe_app {
    ($app_name:expr, $app_creator:expr) => {
        /// Run the application on desktop platforms.
        pub fn run_native() {
            let info = $crate::AppInfo {
                name: $app_name,
                package: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            };
            if let Err(e) = $crate::run_native_impl(info, $app_creator) {
                eprintln!("{} failed: {}", $app_name, e);
                std::process::exit(1);
            }
        }
    };
}

/// Errors that stop the application from starting
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to create async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Eframe(#[from] eframe::Error),
}

/// Internal implementation of the native entry point.
/// Use the `eframe_app!` macro instead of calling this directly.
#[doc(hidden)]
pub fn run_native_impl(
    info: AppInfo,
    app_creator: impl FnOnce(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>,
) -> Result<(), StartupError> {
    // Must happen before any logging
    setup_logging();
    log_version_info(&info);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;
    // Background tasks spawned from the UI thread run on this runtime
    let _guard = runtime.enter();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(info.name)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        info.name,
        native_options,
        Box::new(move |cc| Ok(app_creator(cc))),
    )
    .map_err(StartupError::from)
}
