//! Application module
//!
//! This module provides the main application structure:
//! - Full-screen map view with the overlay plugin
//! - Toggleable sidebar with tabs (Filters, Layers and Areas)
//! - Drag-and-drop support for GeoJSON and CSV files
//! - Persistence of UI settings, filters, data files and navigation state

mod plugin;
pub(crate) mod settings;
mod state;
mod ui_panels;

use crate::app::plugin::{OverlayPlugin, PointerEvents};
use crate::app::settings::Settings;
use crate::app::state::{AppState, FilterForm, TilesProvider, UiSettings};
use eframe::egui;
use ocean_map_lib::{MapConfig, NavigationState, OverlayKey, utils};
use std::path::PathBuf;
use walkers::{
    HttpTiles, Map, MapMemory, TileId,
    sources::{Attribution, OpenStreetMap, TileSource},
};

const STORAGE_KEY: &str = "persisted_settings";

/// Custom OpenTopoMap tile source
pub struct OpenTopoMap;

impl TileSource for OpenTopoMap {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://tile.opentopomap.org/{}/{}/{}.png",
            tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenTopoMap (CC-BY-SA)",
            url: "https://opentopomap.org/",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        17
    }
}

/// Persisted settings (no area data, only the files to reload)
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct PersistedSettings {
    ui: UiSettings,
    filters: FilterForm,
    navigation: NavigationState,
    polygon_paths: Vec<PathBuf>,
    point_path: Option<PathBuf>,
}

/// Main application structure
pub struct OceanMapApp {
    state: AppState,

    /// Map tiles provider (OpenStreetMap)
    tiles_osm: HttpTiles,

    /// Map tiles provider (OpenTopoMap)
    tiles_otm: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,

    /// Overlay under the pointer during the previous frame
    hovered: Option<OverlayKey>,

    /// Viewport last reported to the controller (center, zoom)
    last_view: Option<(geo::Point<f64>, f64)>,
}

impl OceanMapApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let cli_args = Settings::from_cli();

        let config = match cli_args.map_config() {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load map configuration: {}", e);
                MapConfig::default()
            }
        };

        let persisted = if cli_args.ignore_persisted {
            tracing::info!("Ignoring persisted state (--ignore-persisted flag)");
            None
        } else {
            cc.storage.and_then(Self::load_persisted_settings)
        };
        let restored = persisted.is_some();
        let persisted = persisted.unwrap_or_default();

        let mut navigation = persisted.navigation;
        if cli_args.overrides_view() {
            navigation.center = None;
            navigation.zoom = None;
        }
        let (lat, lon) = navigation.center.unwrap_or(config.initial_center);
        let zoom = navigation.zoom.unwrap_or(config.start_zoom);
        let fit_after_load = navigation.center.is_none() && !cli_args.overrides_view();

        let mut state = AppState::new(config, navigation);
        state.ui_settings = persisted.ui;
        state.filter_form = persisted.filters;

        // Persisted files first, then command line files
        state
            .data_loader
            .add_polygon_paths(persisted.polygon_paths.into_iter().filter(|p| p.exists()));
        state.data_loader.point_path = persisted.point_path.filter(|p| p.exists());
        state.data_loader.add_polygon_paths(cli_args.polygons.iter().cloned());
        if let Some(points) = &cli_args.points {
            state.data_loader.point_path = Some(points.clone());
        }
        if state.data_loader.has_files() {
            state.request_load();
            state.pending_fit_bounds = fit_after_load;
        }

        let mut map_memory = MapMemory::default();
        map_memory.center_at(walkers::lat_lon(lat, lon));
        if let Err(e) = map_memory.set_zoom(zoom) {
            tracing::warn!("Invalid initial zoom {}: {:?}", zoom, e);
        }

        tracing::info!(
            "Initialized at ({:.3}, {:.3}) zoom {:.1}, restored settings: {}",
            lat,
            lon,
            zoom,
            restored
        );

        Self {
            state,
            tiles_osm: HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone()),
            tiles_otm: HttpTiles::new(OpenTopoMap, cc.egui_ctx.clone()),
            map_memory,
            hovered: None,
            last_view: None,
        }
    }

    /// Load persisted settings from storage
    fn load_persisted_settings(storage: &dyn eframe::Storage) -> Option<PersistedSettings> {
        let json = storage.get_string(STORAGE_KEY)?;
        match serde_json::from_str::<PersistedSettings>(&json) {
            Ok(settings) => {
                tracing::info!("Restored settings, will reload data files");
                Some(settings)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable persisted settings: {}", e);
                None
            }
        }
    }

    /// Fit the map view to the bounding box of all overlays
    fn fit_to_bounds(&mut self) {
        let Some(bounds) = self.state.controller.bounds() else {
            return;
        };
        let center = bounds.center();
        let zoom = utils::zoom_to_fit(bounds);

        self.map_memory.center_at(walkers::lat_lon(center.y, center.x));
        if let Err(e) = self.map_memory.set_zoom(zoom) {
            tracing::warn!("Cannot fit zoom {}: {:?}", zoom, e);
        }
        tracing::debug!(
            "Fitted to bounds {:?} - {:?}, zoom: {:.1}",
            bounds.min(),
            bounds.max(),
            zoom
        );
    }

    /// Current map center in WGS84
    fn view_center(&self) -> geo::Point<f64> {
        let (lat, lon) = self.state.controller.config().initial_center;
        match self.map_memory.detached() {
            Some(position) => utils::lat_lon(position.y(), position.x()),
            None => utils::lat_lon(lat, lon),
        }
    }

    /// Forward this frame's pointer activity to the controller
    fn dispatch_pointer(&mut self, events: PointerEvents) {
        let now_hovered = events.hovered.as_ref().map(|(key, _)| key);
        if self.hovered.as_ref() != now_hovered
            && let Some(previous) = self.hovered.take()
        {
            self.state.controller.on_hover_end(&previous);
        }

        match events.hovered {
            Some((key, position)) => {
                if events.clicked {
                    self.state.controller.on_click(&key);
                } else {
                    self.state.controller.on_hover(&key, position);
                }
                self.hovered = Some(key);
            }
            None if events.clicked => self.state.controller.on_map_click(),
            None => {}
        }
    }

    /// Tell the controller about zoom changes and finished moves
    fn dispatch_view(&mut self, ctx: &egui::Context) {
        let zoom = self.map_memory.zoom();
        if (zoom - self.state.controller.zoom()).abs() > f64::EPSILON {
            self.state.controller.on_zoom(zoom);
        }

        if ctx.input(|i| i.pointer.any_down()) {
            return;
        }
        let center = self.view_center();
        let moved = match self.last_view {
            Some((last_center, last_zoom)) => {
                last_center != center || (last_zoom - zoom).abs() > f64::EPSILON
            }
            None => true,
        };
        if moved {
            self.last_view = Some((center, zoom));
            self.state.controller.on_move_end(center, zoom);
        }
    }
}

#[profiling::all_functions]
impl eframe::App for OceanMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Finish background loads
        if self.state.process_load() {
            ctx.request_repaint();
        }

        if self.state.pending_fit_bounds && !self.state.data_loader.is_busy() {
            self.state.pending_fit_bounds = false;
            self.fit_to_bounds();
        }
        if let Some((lat, lon)) = self.state.pending_center.take() {
            self.map_memory.center_at(walkers::lat_lon(lat, lon));
        }

        // Selection changes from the sidebar, clicks or elsewhere
        if self.state.observe_navigation() {
            ctx.request_repaint();
        }

        ui_panels::handle_drag_and_drop(ctx, &mut self.state);
        ui_panels::render_sidebar(ctx, &mut self.state);

        let tiles_provider = self.state.ui_settings.tiles_provider;
        let attribution_text = tiles_provider.attribution();
        let (default_lat, default_lon) = self.state.controller.config().initial_center;
        let mut events = PointerEvents::default();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");

                let tiles: &mut HttpTiles = match tiles_provider {
                    TilesProvider::OpenStreetMap => &mut self.tiles_osm,
                    TilesProvider::OpenTopoMap => &mut self.tiles_otm,
                };
                let plugin = OverlayPlugin::new(
                    &self.state.controller,
                    &self.state.triangles,
                    &mut events,
                );
                let map = Map::new(
                    Some(tiles),
                    &mut self.map_memory,
                    walkers::lat_lon(default_lat, default_lon),
                )
                .with_plugin(plugin);
                ui.add(map);

                ui_panels::sidebar_toggle_button(ui, &mut self.state);

                let screen_rect = ui.max_rect();
                ui.painter().text(
                    screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
                    egui::Align2::CENTER_BOTTOM,
                    attribution_text,
                    egui::FontId::proportional(10.0),
                    egui::Color32::from_black_alpha(180),
                );
            });

        let had_tooltip = self.state.controller.canvas().tooltip().is_some();
        self.dispatch_pointer(events);
        self.dispatch_view(ctx);
        if had_tooltip != self.state.controller.canvas().tooltip().is_some() {
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            ui: self.state.ui_settings.clone(),
            filters: self.state.filter_form.clone(),
            navigation: self.state.controller.navigation().get(),
            polygon_paths: self.state.data_loader.polygon_paths.clone(),
            point_path: self.state.data_loader.point_path.clone(),
        };

        match serde_json::to_string(&settings) {
            Ok(json) => {
                storage.set_string(STORAGE_KEY, json);
                tracing::debug!("Saved settings");
            }
            Err(e) => tracing::warn!("Failed to save settings: {}", e),
        }
    }
}
