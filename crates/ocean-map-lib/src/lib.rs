//! Ocean Map Library - Overlay management for ocean-planning area maps
//!
//! This library turns loaded ocean-planning records into map overlays and keeps
//! their visibility, styling and selection consistent while the user filters,
//! scopes by country, toggles layer groups and hovers or clicks areas.
//!
//! # Architecture
//!
//! - **[`FeatureRecord`]**: Typed attribute record for one planning area
//! - **[`loader`]**: GeoJSON polygon layers and CSV point tables
//! - **[`OverlayController`]**: Owns the overlays and drives a [`MapCanvas`]
//! - **[`LayerControl`]**: Overlays grouped by country and scale, with toggles
//! - **[`FilterSet`]**: Attribute predicates applied on top of group visibility
//! - **[`Navigation`]**: Shared selection/viewport state with change observers
//!
//! The controller never renders anything itself. It issues add/remove/style
//! requests against a [`MapCanvas`]; [`MapScene`] is the retained implementation
//! a UI draws from.

mod canvas;
mod config;
mod controller;
mod filter;
mod groups;
pub mod loader;
mod navigation;
mod overlay;
pub mod record;
mod style;
pub mod utils;

// Public API exports
pub use canvas::{MapCanvas, MapScene, Tooltip};
pub use config::MapConfig;
pub use controller::OverlayController;
pub use filter::{Filter, FilterSet, FilterValue, StatusLookup};
pub use groups::{GroupVisibility, LayerControl, LayerGroup, UNSPECIFIED_GROUP};
pub use loader::{Dataset, PolygonRecord};
pub use navigation::{Navigation, NavigationState};
pub use overlay::{Overlay, OverlayKey, OverlayShape};
pub use record::FeatureRecord;
pub use style::{Interaction, OverlayKind, OverlayStyle, Rgba, StylePresets, StyleSet, StyleVariant};

/// Error types for the data module
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("GeoJSON parsing error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty layer")]
    EmptyLayer,
}

pub type Result<T> = std::result::Result<T, DataError>;
