//! Application state management
//!
//! This module manages the application state: the overlay controller and its
//! navigation context, UI settings, the filter form and background data
//! loading.

use crate::app::plugin::TriangleCache;
use eframe_entrypoints::async_runtime::{self, Background, Progress};
use ocean_map_lib::{
    Dataset, Filter, FilterSet, MapConfig, MapScene, Navigation, NavigationState,
    OverlayController, record,
};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tokio::sync::watch;

/// Main application state
pub struct AppState {
    pub controller: OverlayController<MapScene>,

    /// Observer of the navigation context (selection changes)
    pub navigation_rx: watch::Receiver<NavigationState>,

    /// Selection last handed to the controller
    observed_selection: Option<String>,

    /// Fill triangulation of the polygon overlays
    pub triangles: TriangleCache,

    pub ui_settings: UiSettings,

    pub filter_form: FilterForm,

    pub data_loader: DataLoader,

    /// Fit the map to the loaded areas on the next frame
    pub pending_fit_bounds: bool,

    /// Center the map here on the next frame (latitude, longitude)
    pub pending_center: Option<(f64, f64)>,

    /// Time spent handing the last dataset to the controller
    pub last_ingest_ms: f64,
}

/// UI settings that are persisted between runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub tiles_provider: TilesProvider,
    pub sidebar_open: bool,
    pub active_tab: SidebarTab,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tiles_provider: TilesProvider::OpenStreetMap,
            sidebar_open: true,
            active_tab: SidebarTab::Filters,
        }
    }
}

/// Sidebar tabs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SidebarTab {
    Filters,
    Layers,
    Areas,
}

/// Available map tile providers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilesProvider {
    OpenStreetMap,
    OpenTopoMap,
}

impl TilesProvider {
    pub fn attribution(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "© OpenStreetMap contributors",
            Self::OpenTopoMap => "© OpenTopoMap (CC-BY-SA)",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::OpenStreetMap, Self::OpenTopoMap]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::OpenTopoMap => "OpenTopoMap",
        }
    }
}

/// Values of the sidebar filter form
///
/// Empty fields do not constrain anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterForm {
    /// Country the layer control is scoped to
    pub country: String,
    /// Status lookup name
    pub status: String,
    pub scale: String,
    /// Case-insensitive substring of the location name
    pub location: String,
}

impl FilterForm {
    /// Attribute filters for the controller (country scoping is separate)
    pub fn to_filters(&self) -> FilterSet {
        let mut filters = FilterSet::new()
            .with(Filter::new(record::STATUS, self.status.trim()))
            .with(Filter::new(record::SCALE, self.scale.trim()));

        let search = self.location.trim();
        if !search.is_empty() {
            match RegexBuilder::new(&regex::escape(search))
                .case_insensitive(true)
                .build()
            {
                Ok(pattern) => filters.push(Filter::pattern(record::LOCATION, pattern)),
                Err(e) => tracing::warn!("Ignoring location search '{}': {}", search, e),
            }
        }
        filters
    }

    pub fn is_empty(&self) -> bool {
        self.country.trim().is_empty()
            && self.status.trim().is_empty()
            && self.scale.trim().is_empty()
            && self.location.trim().is_empty()
    }
}

/// Data files and their loading state
#[derive(Default)]
pub struct DataLoader {
    /// GeoJSON area boundaries
    pub polygon_paths: Vec<PathBuf>,

    /// CSV area table
    pub point_path: Option<PathBuf>,

    /// Running load, if any
    pub job: Option<Background<Dataset>>,

    /// Load errors of the last load
    pub errors: Vec<(PathBuf, String)>,

    /// Another load was requested while one was running
    pub reload_requested: bool,
}

impl DataLoader {
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    pub fn has_files(&self) -> bool {
        !self.polygon_paths.is_empty() || self.point_path.is_some()
    }

    /// Add polygon layers, skipping ones already known
    pub fn add_polygon_paths(&mut self, paths: impl IntoIterator<Item = PathBuf>) -> usize {
        let mut added = 0;
        for path in paths {
            if !self.polygon_paths.contains(&path) {
                self.polygon_paths.push(path);
                added += 1;
            }
        }
        added
    }

    /// Sort dropped or picked files by extension
    ///
    /// Returns whether anything changed.
    pub fn add_files(&mut self, paths: impl IntoIterator<Item = PathBuf>) -> bool {
        let mut changed = false;
        for path in paths {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase);
            match extension.as_deref() {
                Some("geojson") | Some("json") => {
                    changed |= self.add_polygon_paths([path]) > 0;
                }
                Some("csv") => {
                    changed |= self.point_path.as_ref() != Some(&path);
                    self.point_path = Some(path);
                }
                _ => tracing::warn!("Ignoring unsupported file {}", path.display()),
            }
        }
        changed
    }

    pub fn clear(&mut self) {
        self.polygon_paths.clear();
        self.point_path = None;
        self.errors.clear();
    }
}

impl AppState {
    /// Create the state around a fresh controller
    pub fn new(config: MapConfig, navigation: NavigationState) -> Self {
        let observed_selection = navigation.selected_id.clone();
        let navigation = Navigation::new(navigation);
        let navigation_rx = navigation.subscribe();
        let controller = OverlayController::new(MapScene::new(), navigation, config);

        Self {
            controller,
            navigation_rx,
            observed_selection,
            triangles: TriangleCache::default(),
            ui_settings: UiSettings::default(),
            filter_form: FilterForm::default(),
            data_loader: DataLoader::default(),
            pending_fit_bounds: false,
            pending_center: None,
            last_ingest_ms: 0.0,
        }
    }

    /// Start loading every known data file in the background
    ///
    /// A load already running is finished first; the reload happens after it.
    pub fn request_load(&mut self) {
        if self.data_loader.is_busy() {
            self.data_loader.reload_requested = true;
            return;
        }

        let polygon_paths = self.data_loader.polygon_paths.clone();
        let point_path = self.data_loader.point_path.clone();
        tracing::info!(
            "Loading {} polygon layers and {} area table",
            polygon_paths.len(),
            if point_path.is_some() { "an" } else { "no" }
        );

        self.data_loader.errors.clear();
        if !async_runtime::in_runtime_context() {
            tracing::warn!("No async runtime, loading on the UI thread");
            let dataset = Dataset::load(&polygon_paths, point_path.as_deref());
            self.ingest(dataset);
            return;
        }
        self.data_loader.job = Some(async_runtime::spawn_blocking("load_dataset", move || {
            Dataset::load(&polygon_paths, point_path.as_deref())
        }));
    }

    /// Hand a finished background load to the controller
    ///
    /// Returns `true` while a load is still running.
    pub fn process_load(&mut self) -> bool {
        let Some(job) = self.data_loader.job.as_mut() else {
            return false;
        };

        match job.poll() {
            Progress::Pending => return true,
            Progress::Ready(dataset) => {
                self.data_loader.job = None;
                self.ingest(dataset);
            }
            Progress::Lost => {
                self.data_loader.job = None;
                tracing::error!("Data loading task stopped without a result");
                self.data_loader
                    .errors
                    .push((PathBuf::new(), "Loading stopped unexpectedly".to_string()));
            }
        }

        if std::mem::take(&mut self.data_loader.reload_requested) {
            self.request_load();
        }
        self.data_loader.is_busy()
    }

    /// Replace the overlays with a loaded dataset
    pub fn ingest(&mut self, dataset: Dataset) {
        profiling::scope!("AppState::ingest");
        let started = instant::Instant::now();

        self.data_loader.errors.extend(
            dataset
                .failures
                .into_iter()
                .map(|(path, error)| (path, error.to_string())),
        );

        self.controller.on_data(dataset.polygons, dataset.points);
        self.triangles = TriangleCache::build(&self.controller);
        tracing::debug!("Triangulated {} polygon overlays", self.triangles.len());

        // Scoping and filters survive a reload
        self.apply_country();
        self.apply_filters();
        let selected = self.controller.navigation().selected_id();
        self.controller.highlight_overlay(selected.as_deref());

        self.last_ingest_ms = started.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "{} overlays ready in {:.1} ms",
            self.controller.len(),
            self.last_ingest_ms
        );
    }

    /// Scope the layer control to the form's country
    pub fn apply_country(&mut self) {
        let country = self.filter_form.country.trim();
        if self.controller.selected_country().unwrap_or_default() == country {
            return;
        }
        let country = (!country.is_empty()).then(|| country.to_string());
        self.controller.country_change(country.as_deref());
    }

    /// Push the form's filters to the controller
    pub fn apply_filters(&mut self) {
        self.controller.filter_on(self.filter_form.to_filters());
    }

    /// Clear the form and show everything again
    pub fn reset_filters(&mut self) {
        self.filter_form = FilterForm::default();
        self.apply_country();
        self.apply_filters();
    }

    /// Drop all overlays and forget the data files
    ///
    /// A load still running is abandoned and its result discarded.
    pub fn clear_data(&mut self) {
        if self.data_loader.job.take().is_some() {
            tracing::info!("Abandoning running load");
        }
        self.data_loader.reload_requested = false;
        self.data_loader.clear();
        self.controller.on_data(Vec::new(), Vec::new());
        self.triangles = TriangleCache::default();
    }

    /// React to selection changes made through the navigation context
    ///
    /// Viewport updates are ignored. Returns whether the selection changed.
    pub fn observe_navigation(&mut self) -> bool {
        if !self.navigation_rx.has_changed().unwrap_or(false) {
            return false;
        }
        let selected = self.navigation_rx.borrow_and_update().selected_id.clone();
        if selected == self.observed_selection {
            return false;
        }
        self.controller.highlight_overlay(selected.as_deref());
        self.observed_selection = selected;
        true
    }

    /// Select an area from the sidebar and bring it into view
    pub fn select_area(&mut self, id: &str) {
        self.controller
            .navigation()
            .update(|state| state.selected_id = Some(id.to_string()));
        if let Some(anchor) = self
            .controller
            .overlays_for_id(id)
            .find_map(|overlay| overlay.anchor())
        {
            self.pending_center = Some((anchor.y(), anchor.x()));
        }
    }

    /// Distinct scale values of the loaded areas
    pub fn scale_values(&self) -> BTreeSet<String> {
        self.controller
            .overlays()
            .filter_map(|overlay| overlay.record().scale.clone())
            .collect()
    }

    /// Distinct country values of the loaded areas
    pub fn country_values(&self) -> BTreeSet<String> {
        self.controller
            .overlays()
            .filter_map(|overlay| overlay.record().country.clone())
            .collect()
    }
}
