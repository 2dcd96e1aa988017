//! Ocean Map Viewer - Application Library
//!
//! Integrates the overlay controller from `ocean-map-lib` with a walkers tile
//! map and an egui sidebar to browse ocean-planning areas.

mod app;

pub use app::OceanMapApp;

eframe_entrypoints::eframe_app!("Ocean Map Viewer", |cc| Box::new(OceanMapApp::new(cc)));
