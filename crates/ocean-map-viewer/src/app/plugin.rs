//! Walkers plugin for drawing the overlay scene on the map view
//!
//! The plugin renders what the controller's [`MapScene`] holds (visible layers,
//! their styles, marker radii and the tooltip) and reports which overlay is
//! under the pointer so the app can dispatch hover and click events.

use egui::{Color32, Pos2, Shape, Stroke};
use geo::{Coord, Triangle, TriangulateEarcut};
use ocean_map_lib::{
    MapCanvas, MapScene, OverlayController, OverlayKey, OverlayShape, OverlayStyle, Rgba, utils,
};
use std::collections::HashMap;
use walkers::{Plugin, Projector};

/// Markers never get smaller than this many pixels
const MIN_MARKER_RADIUS: f32 = 2.0;

/// Fill triangles of every polygon overlay, in WGS84
#[derive(Debug, Default)]
pub struct TriangleCache(HashMap<OverlayKey, Vec<Triangle<f64>>>);

impl TriangleCache {
    /// Triangulate all polygon overlays of a controller
    pub fn build(controller: &OverlayController<MapScene>) -> Self {
        profiling::scope!("TriangleCache::build");
        let triangles = controller
            .overlays()
            .filter_map(|overlay| match overlay.shape() {
                OverlayShape::Polygon(polygons) => Some((
                    overlay.key().clone(),
                    polygons
                        .0
                        .iter()
                        .flat_map(|polygon| polygon.earcut_triangles())
                        .collect(),
                )),
                OverlayShape::Point(_) => None,
            })
            .collect();
        Self(triangles)
    }

    pub fn get(&self, key: &OverlayKey) -> &[Triangle<f64>] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// What the pointer did over the overlays during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEvents {
    /// Topmost overlay under the pointer, with the pointer position in WGS84
    pub hovered: Option<(OverlayKey, geo::Point<f64>)>,
    /// The map was clicked this frame
    pub clicked: bool,
}

/// Plugin drawing the overlays of a controller's scene
pub struct OverlayPlugin<'a> {
    controller: &'a OverlayController<MapScene>,
    triangles: &'a TriangleCache,
    events: &'a mut PointerEvents,
}

impl<'a> OverlayPlugin<'a> {
    pub fn new(
        controller: &'a OverlayController<MapScene>,
        triangles: &'a TriangleCache,
        events: &'a mut PointerEvents,
    ) -> Self {
        Self {
            controller,
            triangles,
            events,
        }
    }

    fn draw_polygon(
        &self,
        key: &OverlayKey,
        polygons: &geo::MultiPolygon<f64>,
        style: OverlayStyle,
        projector: &Projector,
        painter: &egui::Painter,
    ) {
        let fill = to_color32(style.fill);
        if fill.a() > 0 {
            let mut mesh = egui::Mesh::default();
            for triangle in self.triangles.get(key) {
                let base = mesh.vertices.len() as u32;
                for coord in triangle.to_array() {
                    mesh.colored_vertex(coord_to_screen(projector, coord), fill);
                }
                mesh.add_triangle(base, base + 1, base + 2);
            }
            painter.add(Shape::mesh(mesh));
        }

        let stroke = Stroke::new(style.weight, to_color32(style.stroke));
        for polygon in &polygons.0 {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                let points: Vec<Pos2> = ring
                    .coords()
                    .map(|coord| coord_to_screen(projector, *coord))
                    .collect();
                if points.len() >= 3 {
                    painter.add(Shape::closed_line(points, stroke));
                }
            }
        }
    }

    fn draw_tooltip(&self, ui: &egui::Ui, projector: &Projector) {
        let Some(tooltip) = self.controller.canvas().tooltip() else {
            return;
        };
        let painter = ui.painter();
        let anchor = point_to_screen(projector, &tooltip.anchor);
        let galley = painter.layout_no_wrap(
            tooltip.text.clone(),
            egui::FontId::proportional(13.0),
            ui.visuals().text_color(),
        );
        let rect = egui::Rect::from_min_size(
            anchor + egui::vec2(14.0, -galley.size().y - 14.0),
            galley.size(),
        )
        .expand(4.0);

        painter.rect_filled(rect, 4.0, ui.visuals().window_fill);
        painter.rect_stroke(
            rect,
            4.0,
            ui.visuals().window_stroke,
            egui::StrokeKind::Outside,
        );
        painter.galley(
            rect.min + egui::vec2(4.0, 4.0),
            galley,
            ui.visuals().text_color(),
        );
    }
}

impl Plugin for OverlayPlugin<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("OverlayPlugin::run");

        let controller = self.controller;
        let scene = controller.canvas();
        let painter = ui.painter().clone();
        let pointer = response.hover_pos();
        let pointer_geo = pointer.map(|pos| screen_to_point(projector, pos));
        let mut hovered: Option<&OverlayKey> = None;

        // Later overlays are drawn on top, so the last hit wins
        for overlay in controller.overlays() {
            let key = overlay.key();
            if !scene.has_layer(key) {
                continue;
            }
            let Some(style) = scene.style(key) else {
                continue;
            };

            match overlay.shape() {
                OverlayShape::Polygon(polygons) => {
                    self.draw_polygon(key, polygons, style, projector, &painter);
                    if pointer_geo.is_some_and(|position| overlay.contains(&position)) {
                        hovered = Some(key);
                    }
                }
                OverlayShape::Point(point) => {
                    let center = point_to_screen(projector, point);
                    let radius = scene
                        .radius(key)
                        .map_or(MIN_MARKER_RADIUS, |r| (r as f32).max(MIN_MARKER_RADIUS));
                    painter.circle(
                        center,
                        radius,
                        to_color32(style.fill),
                        Stroke::new(style.weight, to_color32(style.stroke)),
                    );
                    if pointer.is_some_and(|pos| pos.distance(center) <= radius) {
                        hovered = Some(key);
                    }
                }
            }
        }

        self.draw_tooltip(ui, projector);

        self.events.hovered = hovered.zip(pointer_geo).map(|(key, pos)| (key.clone(), pos));
        self.events.clicked = response.clicked();
    }
}

pub fn to_color32(rgba: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba.r(), rgba.g(), rgba.b(), rgba.a())
}

fn coord_to_screen(projector: &Projector, coord: Coord<f64>) -> Pos2 {
    projector.project(walkers::lat_lon(coord.y, coord.x)).to_pos2()
}

fn point_to_screen(projector: &Projector, point: &geo::Point<f64>) -> Pos2 {
    coord_to_screen(projector, point.0)
}

fn screen_to_point(projector: &Projector, pos: Pos2) -> geo::Point<f64> {
    let position = projector.unproject(pos.to_vec2());
    utils::lat_lon(position.y(), position.x())
}
