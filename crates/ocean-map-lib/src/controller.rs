//! OverlayController - Owns the overlays and keeps the map in sync with them
//!
//! The controller ingests records, decides per overlay whether it is shown
//! (group toggles first, then attribute filters), applies the style variant
//! that matches its status and selection, and reacts to zoom, hover and click.
//!
//! It owns no UI. All visual effects go through a [`MapCanvas`], and the
//! selected area is owned by the shared [`Navigation`] state: clicks write
//! to it, and whoever observes it calls [`OverlayController::highlight_overlay`].

use crate::loader::PolygonRecord;
use crate::record::parse_numeric_id;
use crate::style::{Interaction, style_variant};
use crate::{
    FeatureRecord, FilterSet, GroupVisibility, LayerControl, MapCanvas, MapConfig, Navigation,
    Overlay, OverlayKey, OverlayShape, utils,
};
use geo::{Point, Rect};
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Owner of all overlays of one map
pub struct OverlayController<C: MapCanvas> {
    canvas: C,
    navigation: Navigation,
    config: MapConfig,
    /// Overlays by lookup key, polygons first, each sorted by numeric id
    overlays: IndexMap<OverlayKey, Overlay>,
    /// Keys of point overlays
    markers: Vec<OverlayKey>,
    layer_control: Option<LayerControl>,
    /// `None` until the first grouping
    group_visibility: Option<GroupVisibility>,
    current_filters: Option<FilterSet>,
    selected_country: Option<String>,
    zoom: f64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<C: MapCanvas> OverlayController<C> {
    /// Create an empty controller
    pub fn new(canvas: C, navigation: Navigation, config: MapConfig) -> Self {
        let zoom = navigation.get().zoom.unwrap_or(config.start_zoom);
        Self {
            canvas,
            navigation,
            config,
            overlays: IndexMap::new(),
            markers: Vec::new(),
            layer_control: None,
            group_visibility: None,
            current_filters: None,
            selected_country: None,
            zoom,
        }
    }

    /// Replace all overlays with freshly loaded records
    ///
    /// Polygons are added first, then every point record that has both
    /// coordinates and whose lookup key is not already taken by a polygon.
    pub fn on_data(&mut self, mut polygons: Vec<PolygonRecord>, mut points: Vec<FeatureRecord>) {
        #[cfg(feature = "profiling")]
        profiling::scope!("controller::on_data");

        self.overlays.clear();
        self.markers.clear();
        self.canvas.clear();

        polygons.sort_by(|a, b| compare_ids(Some(&a.source_id), Some(&b.source_id)));
        for polygon in polygons {
            let key = OverlayKey::new(&polygon.source_id, polygon.record.location.as_deref());
            let overlay = Overlay::new(
                key,
                polygon.record,
                OverlayShape::Polygon(polygon.geometry),
            );
            self.insert_overlay(overlay);
        }
        let polygon_count = self.overlays.len();

        points.sort_by(|a, b| compare_ids(a.id.as_deref(), b.id.as_deref()));
        let mut missing_coordinates = 0;
        let mut shadowed = 0;
        let mut duplicates = 0;
        let radius = utils::radius_for_zoom(self.zoom);
        for record in points {
            let Some((lat, lon)) = record.coordinates() else {
                missing_coordinates += 1;
                continue;
            };
            let key = OverlayKey::new(
                record.id.as_deref().unwrap_or_default(),
                record.location.as_deref(),
            );
            match self.overlays.get(&key).map(Overlay::shape) {
                // The area already has a shape
                Some(OverlayShape::Polygon(_)) => {
                    shadowed += 1;
                    continue;
                }
                Some(OverlayShape::Point(_)) => {
                    duplicates += 1;
                    continue;
                }
                None => {}
            }
            self.canvas.set_radius(&key, radius);
            self.markers.push(key.clone());
            let overlay = Overlay::new(key, record, OverlayShape::Point(utils::lat_lon(lat, lon)));
            self.insert_overlay(overlay);
        }

        tracing::info!(
            "Ingested {} polygon and {} point overlays ({} rows without coordinates, {} already drawn as polygons, {} duplicate rows)",
            polygon_count,
            self.markers.len(),
            missing_coordinates,
            shadowed,
            duplicates
        );

        self.group_overlays();
    }

    fn insert_overlay(&mut self, overlay: Overlay) {
        let style = self.style_for(&overlay, overlay.resting_interaction());
        self.canvas.set_style(overlay.key(), style);
        self.overlays.insert(overlay.key().clone(), overlay);
    }

    /// Highlight the overlays of one record id and restore all others
    ///
    /// `None` or an unknown id leaves nothing selected.
    pub fn highlight_overlay(&mut self, id: Option<&str>) {
        let mut highlighted = 0;
        for overlay in self.overlays.values_mut() {
            overlay.selected = id.is_some() && overlay.record().id.as_deref() == id;
            if overlay.selected {
                highlighted += 1;
            }
        }
        self.restyle_all();
        tracing::debug!("Highlighted {} overlays for id {:?}", highlighted, id);
    }

    /// Show the overlays that are group-visible and pass every filter
    ///
    /// The filters are kept and reapplied whenever grouping changes.
    pub fn filter_on(&mut self, filters: FilterSet) {
        #[cfg(feature = "profiling")]
        profiling::scope!("controller::filter_on");

        let mut shown = 0;
        for (key, overlay) in &self.overlays {
            let (country, scale) = overlay.group();
            let group_visible = self
                .group_visibility
                .as_ref()
                .is_none_or(|visibility| visibility.is_visible(country, scale));

            if group_visible && filters.matches(overlay.record(), &self.config.status_lookup) {
                self.canvas.add_layer(key);
                shown += 1;
            } else {
                self.canvas.remove_layer(key);
            }
        }

        tracing::debug!(
            "Filter with {} constraints shows {}/{} overlays",
            filters.constraint_count(),
            shown,
            self.overlays.len()
        );
        self.current_filters = Some(filters);
    }

    /// Rebuild the grouped layer control from scratch
    ///
    /// With a selected country, overlays of other countries are left out of
    /// the control and taken off the map.
    pub fn group_overlays(&mut self) {
        #[cfg(feature = "profiling")]
        profiling::scope!("controller::group_overlays");

        let mut control = LayerControl::new();
        for (key, overlay) in &self.overlays {
            let (country, scale) = overlay.group();
            let included = match &self.selected_country {
                Some(selected) => overlay
                    .record()
                    .country
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase() == selected.to_lowercase()),
                None => true,
            };

            if included {
                control.insert(country, scale, key.clone());
                self.canvas.add_layer(key);
            } else {
                self.canvas.remove_layer(key);
            }
        }

        tracing::debug!(
            "Grouped {}/{} overlays into {} countries",
            control.member_count(),
            self.overlays.len(),
            control.countries().count()
        );

        self.group_visibility = Some(control.visibility());
        self.layer_control = Some(control);

        if let Some(filters) = self.current_filters.take() {
            self.filter_on(filters);
        }
    }

    /// Restrict grouping to one country (case-insensitive), or to none
    pub fn country_change(&mut self, country: Option<&str>) {
        self.selected_country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        tracing::info!("Country scope: {:?}", self.selected_country);
        self.group_overlays();
    }

    /// Switch a (country, scale) group of the layer control on or off
    ///
    /// Returns `false` when there is no such group.
    pub fn set_group_enabled(&mut self, country: &str, scale: &str, enabled: bool) -> bool {
        let Some(control) = self.layer_control.as_mut() else {
            return false;
        };
        if !control.set_enabled(country, scale, enabled) {
            return false;
        }

        if let Some(group) = control.group(country, scale) {
            for key in group.members() {
                if enabled {
                    self.canvas.add_layer(key);
                } else {
                    self.canvas.remove_layer(key);
                }
            }
        }
        self.group_visibility = Some(control.visibility());

        if let Some(filters) = self.current_filters.take() {
            self.filter_on(filters);
        }
        true
    }

    /// Resize every point marker for a new zoom level
    pub fn on_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        let radius = utils::radius_for_zoom(zoom);
        for key in &self.markers {
            self.canvas.set_radius(key, radius);
        }
    }

    /// Pointer entered (or moved over) an overlay
    pub fn on_hover(&mut self, key: &OverlayKey, position: Point<f64>) {
        let Some(overlay) = self.overlays.get(key) else {
            tracing::debug!("Hover on unknown overlay {}", key);
            return;
        };
        if overlay.is_selected() {
            return;
        }
        tracing::trace!("Hover {}", key);
        self.canvas.show_tooltip(overlay.tooltip_text(), position);
        let style = self.style_for(overlay, Interaction::Hovered);
        self.canvas.set_style(key, style);
    }

    /// Pointer left an overlay
    pub fn on_hover_end(&mut self, key: &OverlayKey) {
        self.canvas.hide_tooltip();
        let Some(overlay) = self.overlays.get(key) else {
            return;
        };
        if overlay.is_selected() {
            return;
        }
        let style = self.style_for(overlay, Interaction::Idle);
        self.canvas.set_style(key, style);
    }

    /// Overlay clicked: toggle its record as the selected area
    pub fn on_click(&mut self, key: &OverlayKey) {
        self.canvas.hide_tooltip();
        let Some(overlay) = self.overlays.get(key) else {
            tracing::debug!("Click on unknown overlay {}", key);
            return;
        };
        match overlay.record().id.as_deref() {
            Some(id) => self.navigation.toggle_selected(id),
            None => tracing::warn!("Overlay {} has no record id to select", key),
        }
    }

    /// Click on the map outside every overlay
    pub fn on_map_click(&mut self) {
        self.canvas.hide_tooltip();
    }

    /// The map stopped moving; record the viewport unless an intro is showing
    pub fn on_move_end(&mut self, center: Point<f64>, zoom: f64) {
        self.navigation.update(|state| {
            if state.intro {
                return;
            }
            state.center = Some((center.y(), center.x()));
            state.zoom = Some(zoom);
        });
    }

    /// Bounding rectangle of all overlays in WGS84
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.overlays
            .values()
            .filter_map(Overlay::bounds)
            .reduce(utils::union_rect)
    }

    fn restyle_all(&mut self) {
        for (key, overlay) in &self.overlays {
            let style = self.style_for(overlay, overlay.resting_interaction());
            self.canvas.set_style(key, style);
        }
    }

    fn style_for(&self, overlay: &Overlay, interaction: Interaction) -> crate::OverlayStyle {
        let pre_planning = overlay
            .record()
            .has_status(&self.config.pre_planning_status);
        self.config
            .styles
            .resolve(overlay.kind(), style_variant(pre_planning, interaction))
    }

    /// All overlays in ingestion order
    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    pub fn overlay(&self, key: &OverlayKey) -> Option<&Overlay> {
        self.overlays.get(key)
    }

    /// Overlays belonging to a record id
    pub fn overlays_for_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Overlay> + 'a {
        self.overlays
            .values()
            .filter(move |overlay| overlay.record().id.as_deref() == Some(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    #[inline]
    pub fn markers(&self) -> &[OverlayKey] {
        &self.markers
    }

    #[inline]
    pub fn layer_control(&self) -> Option<&LayerControl> {
        self.layer_control.as_ref()
    }

    #[inline]
    pub fn group_visibility(&self) -> Option<&GroupVisibility> {
        self.group_visibility.as_ref()
    }

    #[inline]
    pub fn current_filters(&self) -> Option<&FilterSet> {
        self.current_filters.as_ref()
    }

    #[inline]
    pub fn selected_country(&self) -> Option<&str> {
        self.selected_country.as_deref()
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[inline]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    #[inline]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}

/// Ascending numeric order; non-numeric ids after numeric ones, ties stable
fn compare_ids(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.and_then(parse_numeric_id);
    let b = b.and_then(parse_numeric_id);
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{OverlayKind, StyleVariant};
    use crate::{Filter, MapScene, NavigationState};
    use geo::{MultiPolygon, polygon};

    fn point_record(id: &str, country: &str, scale: &str, status: &str) -> FeatureRecord {
        let location = format!("Area {}", id);
        FeatureRecord::from_attributes([
            ("ID", id),
            ("Country", country),
            ("Scale", scale),
            ("Status", status),
            ("Location", location.as_str()),
            ("Latitude", "-20.0"),
            ("Longitude", "-75.0"),
        ])
    }

    fn polygon_record(id: &str, country: &str, scale: &str, location: Option<&str>) -> PolygonRecord {
        let mut attributes = vec![
            ("ID".to_string(), id.to_string()),
            ("Country".to_string(), country.to_string()),
            ("Scale".to_string(), scale.to_string()),
            ("Status".to_string(), "Active".to_string()),
        ];
        if let Some(location) = location {
            attributes.push(("Location".to_string(), location.to_string()));
        }
        PolygonRecord {
            source_id: id.to_string(),
            record: FeatureRecord::from_attributes(attributes),
            geometry: MultiPolygon::new(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]]),
        }
    }

    fn controller() -> OverlayController<MapScene> {
        OverlayController::new(MapScene::new(), Navigation::default(), MapConfig::default())
    }

    fn example_controller() -> OverlayController<MapScene> {
        let mut controller = controller();
        controller.on_data(
            Vec::new(),
            vec![
                point_record("1", "Chile", "National", "Active"),
                point_record("2", "Peru", "Local", "Pre-planning"),
            ],
        );
        controller
    }

    fn key(id: &str) -> OverlayKey {
        OverlayKey::new(id, Some(&format!("Area {}", id)))
    }

    fn visible_ids(controller: &OverlayController<MapScene>) -> Vec<String> {
        controller
            .overlays()
            .filter(|o| controller.canvas().has_layer(o.key()))
            .filter_map(|o| o.record().id.clone())
            .collect()
    }

    fn selected_count(controller: &OverlayController<MapScene>) -> usize {
        controller.overlays().filter(|o| o.is_selected()).count()
    }

    #[test]
    fn test_ingestion_order() {
        let mut controller = controller();
        controller.on_data(
            vec![
                polygon_record("10", "Chile", "National", Some("Ten")),
                polygon_record("9", "Chile", "National", Some("Nine")),
            ],
            vec![
                point_record("3", "Peru", "Local", "Active"),
                point_record("20", "Peru", "Local", "Active"),
                point_record("100", "Peru", "Local", "Active"),
            ],
        );

        let keys: Vec<&str> = controller.overlays().map(|o| o.key().as_str()).collect();
        assert_eq!(
            keys,
            vec!["9: Nine", "10: Ten", "3: Area 3", "20: Area 20", "100: Area 100"]
        );
        assert_eq!(controller.markers().len(), 3);
    }

    #[test]
    fn test_polygon_takes_precedence_over_point() {
        let mut controller = controller();
        controller.on_data(
            vec![polygon_record("1", "Chile", "National", Some("Area 1"))],
            vec![
                point_record("1", "Chile", "National", "Active"),
                point_record("2", "Chile", "National", "Active"),
            ],
        );

        assert_eq!(controller.len(), 2);
        let first = controller.overlay(&key("1")).unwrap();
        assert_eq!(first.kind(), OverlayKind::Polygon);
        assert_eq!(controller.markers(), &[key("2")]);
    }

    #[test]
    fn test_duplicate_point_keeps_first_row() {
        let mut controller = controller();
        controller.on_data(
            Vec::new(),
            vec![
                point_record("1", "Chile", "National", "Active"),
                point_record("1", "Peru", "Local", "Pre-planning"),
            ],
        );

        assert_eq!(controller.len(), 1);
        assert_eq!(controller.markers(), &[key("1")]);
        let kept = controller.overlay(&key("1")).unwrap();
        assert_eq!(kept.record().country.as_deref(), Some("Chile"));
    }

    #[test]
    fn test_points_without_coordinates_are_skipped() {
        let mut controller = controller();
        let mut no_lat = point_record("1", "Chile", "National", "Active");
        no_lat.latitude = None;
        let mut no_lon = point_record("2", "Chile", "National", "Active");
        no_lon.longitude = None;
        controller.on_data(
            Vec::new(),
            vec![no_lat, no_lon, point_record("3", "Chile", "National", "Active")],
        );

        assert_eq!(controller.len(), 1);
        assert!(controller.overlay(&key("3")).is_some());
    }

    #[test]
    fn test_missing_location_uses_fallback_label() {
        let mut controller = controller();
        controller.on_data(vec![polygon_record("4", "Chile", "National", None)], Vec::new());
        assert!(
            controller
                .overlay(&OverlayKey::new("4", Some("no shape")))
                .is_some()
        );
    }

    #[test]
    fn test_reingestion_replaces_overlays() {
        let mut controller = example_controller();
        controller.highlight_overlay(Some("1"));
        controller.on_data(Vec::new(), vec![point_record("5", "Chile", "Local", "Active")]);

        assert_eq!(controller.len(), 1);
        assert!(controller.overlay(&key("1")).is_none());
        assert_eq!(selected_count(&controller), 0);
        assert_eq!(controller.canvas().visible_count(), 1);
    }

    #[test]
    fn test_ingestion_shows_everything() {
        let controller = example_controller();
        assert_eq!(visible_ids(&controller), vec!["1", "2"]);
        assert!(controller.layer_control().is_some());
    }

    #[test]
    fn test_highlight_sets_selected_and_style() {
        let mut controller = example_controller();
        controller.highlight_overlay(Some("1"));

        let presets = &controller.config().styles;
        assert!(controller.overlay(&key("1")).unwrap().is_selected());
        assert!(!controller.overlay(&key("2")).unwrap().is_selected());
        assert_eq!(
            controller.canvas().style(&key("1")),
            Some(presets.resolve(OverlayKind::Point, StyleVariant::Highlighted))
        );
        assert_eq!(
            controller.canvas().style(&key("2")),
            Some(presets.resolve(OverlayKind::Point, StyleVariant::PrePlanning))
        );
    }

    #[test]
    fn test_highlight_is_idempotent() {
        let mut controller = example_controller();
        controller.highlight_overlay(Some("2"));
        let once: Vec<bool> = controller.overlays().map(|o| o.is_selected()).collect();
        let styles_once: Vec<_> = controller
            .overlays()
            .map(|o| controller.canvas().style(o.key()))
            .collect();

        controller.highlight_overlay(Some("2"));
        let twice: Vec<bool> = controller.overlays().map(|o| o.is_selected()).collect();
        let styles_twice: Vec<_> = controller
            .overlays()
            .map(|o| controller.canvas().style(o.key()))
            .collect();

        assert_eq!(once, twice);
        assert_eq!(styles_once, styles_twice);
    }

    #[test]
    fn test_highlight_missing_id_clears_selection() {
        let mut controller = example_controller();
        controller.highlight_overlay(Some("1"));
        controller.highlight_overlay(Some("404"));
        assert_eq!(selected_count(&controller), 0);

        controller.highlight_overlay(Some("1"));
        controller.highlight_overlay(None);
        assert_eq!(selected_count(&controller), 0);
        assert_eq!(
            controller.canvas().style(&key("1")),
            Some(
                controller
                    .config()
                    .styles
                    .resolve(OverlayKind::Point, StyleVariant::Normal)
            )
        );
    }

    #[test]
    fn test_filter_on_country() {
        let mut controller = example_controller();
        controller.filter_on(FilterSet::new().with(Filter::new("Country", "Chile")));
        assert_eq!(visible_ids(&controller), vec!["1"]);
    }

    #[test]
    fn test_filter_on_status_example() {
        let mut controller = example_controller();
        controller.filter_on(FilterSet::new().with(Filter::new("Status", "Active")));
        assert!(controller.canvas().has_layer(&key("1")));
        assert!(!controller.canvas().has_layer(&key("2")));
    }

    #[test]
    fn test_empty_filters_show_all_group_visible() {
        let mut controller = example_controller();
        controller.filter_on(FilterSet::new().with(Filter::new("Country", "Chile")));
        controller.set_group_enabled("Chile", "National", false);

        controller.filter_on(FilterSet::new());
        assert_eq!(visible_ids(&controller), vec!["2"]);

        controller.filter_on(FilterSet::new().with(Filter::new("Country", "")));
        assert_eq!(visible_ids(&controller), vec!["2"]);
    }

    #[test]
    fn test_filter_before_grouping_treats_groups_visible() {
        let mut controller = controller();
        assert!(controller.group_visibility().is_none());
        controller.filter_on(FilterSet::new());
        assert_eq!(controller.canvas().visible_count(), 0);

        let mut controller = example_controller();
        controller.group_visibility = None;
        controller.filter_on(FilterSet::new().with(Filter::new("Scale", "Local")));
        assert_eq!(visible_ids(&controller), vec!["2"]);
    }

    #[test]
    fn test_disabled_group_hides_regardless_of_filter() {
        let mut controller = example_controller();
        assert!(controller.set_group_enabled("Peru", "Local", false));
        assert!(!controller.canvas().has_layer(&key("2")));

        controller.filter_on(FilterSet::new().with(Filter::new("Country", "Peru")));
        assert!(visible_ids(&controller).is_empty());

        assert!(controller.set_group_enabled("Peru", "Local", true));
        assert_eq!(visible_ids(&controller), vec!["2"]);
    }

    #[test]
    fn test_set_unknown_group() {
        let mut controller = controller();
        assert!(!controller.set_group_enabled("Chile", "National", false));
        let mut controller = example_controller();
        assert!(!controller.set_group_enabled("Chile", "Local", false));
    }

    #[test]
    fn test_country_change_excludes_other_countries() {
        let mut controller = controller();
        controller.on_data(
            vec![polygon_record("7", "CHILE", "Regional", Some("Coast"))],
            vec![
                point_record("1", "Chile", "National", "Active"),
                point_record("2", "Peru", "Local", "Pre-planning"),
            ],
        );

        controller.country_change(Some("chile"));
        controller.group_overlays();

        let control = controller.layer_control().unwrap();
        assert!(control.contains(&key("1")));
        assert!(control.contains(&OverlayKey::new("7", Some("Coast"))));
        assert!(!control.contains(&key("2")));
        assert_eq!(control.countries().collect::<Vec<_>>(), vec!["CHILE", "Chile"]);
        assert!(!controller.canvas().has_layer(&key("2")));

        controller.filter_on(FilterSet::new());
        assert!(!controller.canvas().has_layer(&key("2")));

        controller.country_change(None);
        assert!(controller.layer_control().unwrap().contains(&key("2")));
        assert!(controller.canvas().has_layer(&key("2")));
    }

    #[test]
    fn test_grouping_reapplies_filters() {
        let mut controller = example_controller();
        controller.filter_on(FilterSet::new().with(Filter::new("Status", "Active")));
        controller.country_change(None);
        assert_eq!(visible_ids(&controller), vec!["1"]);
    }

    #[test]
    fn test_zoom_sets_marker_radius() {
        let mut controller = example_controller();
        for zoom in [2.0, 7.0, 4.0] {
            controller.on_zoom(zoom);
        }
        let expected = 1.7f64.powf(4.0) / 2.0;
        for marker in controller.markers() {
            let radius = controller.canvas().radius(marker).unwrap();
            assert!((radius - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_new_markers_use_current_zoom() {
        let mut controller = controller();
        controller.on_zoom(6.0);
        controller.on_data(Vec::new(), vec![point_record("1", "Chile", "National", "Active")]);
        let radius = controller.canvas().radius(&key("1")).unwrap();
        assert!((radius - utils::radius_for_zoom(6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hover_shows_tooltip_and_style() {
        let mut controller = example_controller();
        let position = utils::lat_lon(-20.0, -75.0);
        controller.on_hover(&key("1"), position);

        let tooltip = controller.canvas().tooltip().unwrap();
        assert_eq!(tooltip.text, "Area 1");
        assert_eq!(
            controller.canvas().style(&key("1")),
            Some(
                controller
                    .config()
                    .styles
                    .resolve(OverlayKind::Point, StyleVariant::Mouseover)
            )
        );

        controller.on_hover_end(&key("1"));
        assert!(controller.canvas().tooltip().is_none());
        assert_eq!(
            controller.canvas().style(&key("1")),
            Some(
                controller
                    .config()
                    .styles
                    .resolve(OverlayKind::Point, StyleVariant::Normal)
            )
        );
    }

    #[test]
    fn test_hover_ignores_selected_overlay() {
        let mut controller = example_controller();
        controller.highlight_overlay(Some("2"));
        controller.on_hover(&key("2"), utils::lat_lon(0.0, 0.0));
        assert!(controller.canvas().tooltip().is_none());

        controller.on_hover_end(&key("2"));
        assert_eq!(
            controller.canvas().style(&key("2")),
            Some(
                controller
                    .config()
                    .styles
                    .resolve(OverlayKind::Point, StyleVariant::Highlighted)
            )
        );
    }

    #[test]
    fn test_hover_without_location_uses_fallback() {
        let mut controller = controller();
        controller.on_data(vec![polygon_record("4", "Chile", "National", None)], Vec::new());
        let key = OverlayKey::new("4", None);
        controller.on_hover(&key, utils::lat_lon(0.5, 0.5));
        assert_eq!(
            controller.canvas().tooltip().map(|t| t.text.as_str()),
            Some("Location not found")
        );
        assert_eq!(
            controller.canvas().style(&key),
            Some(
                controller
                    .config()
                    .styles
                    .resolve(OverlayKind::Polygon, StyleVariant::Mouseover)
            )
        );
    }

    #[test]
    fn test_click_toggles_navigation_selection() {
        let mut controller = example_controller();
        let mut observer = controller.navigation().subscribe();

        controller.on_hover(&key("1"), utils::lat_lon(0.0, 0.0));
        controller.on_click(&key("1"));
        assert!(controller.canvas().tooltip().is_none());
        assert_eq!(controller.navigation().selected_id().as_deref(), Some("1"));
        assert!(observer.has_changed().unwrap());
        // Highlighting is driven by the observer, not by the click
        assert_eq!(selected_count(&controller), 0);

        let selected = observer.borrow_and_update().selected_id.clone();
        controller.highlight_overlay(selected.as_deref());
        assert_eq!(selected_count(&controller), 1);

        controller.on_click(&key("2"));
        assert_eq!(controller.navigation().selected_id().as_deref(), Some("2"));
        controller.on_click(&key("2"));
        assert!(controller.navigation().selected_id().is_none());
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut controller = example_controller();
        let unknown = OverlayKey::new("99", None);
        controller.on_hover(&unknown, utils::lat_lon(0.0, 0.0));
        controller.on_click(&unknown);
        assert!(controller.canvas().tooltip().is_none());
        assert!(controller.navigation().selected_id().is_none());
    }

    #[test]
    fn test_map_click_closes_tooltip() {
        let mut controller = example_controller();
        controller.on_hover(&key("1"), utils::lat_lon(0.0, 0.0));
        controller.on_map_click();
        assert!(controller.canvas().tooltip().is_none());
    }

    #[test]
    fn test_move_end_records_viewport() {
        let mut controller = example_controller();
        controller.on_move_end(utils::lat_lon(10.0, 20.0), 5.0);
        let state = controller.navigation().get();
        assert_eq!(state.center, Some((10.0, 20.0)));
        assert_eq!(state.zoom, Some(5.0));
    }

    #[test]
    fn test_move_end_ignored_during_intro() {
        let navigation = Navigation::new(NavigationState {
            intro: true,
            ..Default::default()
        });
        let mut controller =
            OverlayController::new(MapScene::new(), navigation, MapConfig::default());
        controller.on_move_end(utils::lat_lon(10.0, 20.0), 5.0);
        assert!(controller.navigation().get().center.is_none());
    }

    #[test]
    fn test_bounds() {
        let mut controller = controller();
        assert!(controller.bounds().is_none());

        controller.on_data(
            vec![polygon_record("1", "Chile", "National", Some("A"))],
            vec![point_record("2", "Peru", "Local", "Active")],
        );
        let bounds = controller.bounds().unwrap();
        assert_eq!(bounds.min().x, -75.0);
        assert_eq!(bounds.min().y, -20.0);
        assert_eq!(bounds.max().x, 1.0);
        assert_eq!(bounds.max().y, 1.0);
    }

    #[test]
    fn test_compare_ids() {
        assert_eq!(compare_ids(Some("2"), Some("10")), Ordering::Less);
        assert_eq!(compare_ids(Some("x"), Some("10")), Ordering::Greater);
        assert_eq!(compare_ids(None, None), Ordering::Equal);
    }
}
