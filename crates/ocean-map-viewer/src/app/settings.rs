use clap::Parser;
use eframe_entrypoints::parse_args;
use ocean_map_lib::{DataError, MapConfig};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Ocean Map Viewer - Explore ocean-planning areas on an interactive map
pub struct Settings {
    /// GeoJSON layers with area boundaries (one area per file)
    #[clap(short, long, value_name = "FILE", num_args = 1..)]
    pub polygons: Vec<PathBuf>,

    /// CSV table of all areas, with optional Latitude/Longitude columns
    #[clap(short = 't', long, value_name = "FILE")]
    pub points: Option<PathBuf>,

    /// JSON map configuration (styles, status names, initial view)
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial zoom level (overrides the configuration)
    #[clap(long)]
    pub zoom: Option<f64>,

    /// Initial center latitude (overrides the configuration)
    #[clap(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Initial center longitude (overrides the configuration)
    #[clap(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Ignore previously persisted state and start fresh
    #[clap(long, default_value = "false")]
    pub ignore_persisted: bool,
}

impl Settings {
    /// Parse the command line, exiting with a usage message on error
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Whether the command line asks for a specific initial view
    pub fn overrides_view(&self) -> bool {
        self.zoom.is_some() || self.lat.is_some() || self.lon.is_some()
    }

    /// Load the map configuration and apply the view overrides
    pub fn map_config(&self) -> Result<MapConfig, DataError> {
        let mut config = match &self.config {
            Some(path) => MapConfig::from_json_file(path)?,
            None => MapConfig::default(),
        };
        if let Some(zoom) = self.zoom {
            config.start_zoom = zoom;
        }
        if let Some(lat) = self.lat {
            config.initial_center.0 = lat;
        }
        if let Some(lon) = self.lon {
            config.initial_center.1 = lon;
        }
        Ok(config)
    }
}
