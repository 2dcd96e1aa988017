//! Map configuration: initial view, style presets and status names

use crate::{Result, StatusLookup, StylePresets};
use serde::Deserialize;
use std::path::Path;

/// Configuration shared by the controller and the viewer
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Zoom level the map starts at
    pub start_zoom: f64,
    /// Initial map center as (latitude, longitude)
    pub initial_center: (f64, f64),
    /// Status value drawn with the pre-planning style
    pub pre_planning_status: String,
    pub styles: StylePresets,
    pub status_lookup: StatusLookup,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            start_zoom: 3.0,
            initial_center: (35.0, -105.0),
            pre_planning_status: "Pre-planning".to_string(),
            styles: StylePresets::default(),
            status_lookup: StatusLookup::default(),
        }
    }
}

impl MapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
