//! Overlays: one renderable map feature bound to one record

use crate::FeatureRecord;
use crate::groups::UNSPECIFIED_GROUP;
use crate::style::{Interaction, OverlayKind};
use geo::{BoundingRect, Contains, MultiPolygon, Point, Rect};
use std::fmt;

/// Label used when a record has no Location
pub const FALLBACK_LABEL: &str = "no shape";

/// Lookup key of an overlay: `"<id>: <Location>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayKey(String);

impl OverlayKey {
    /// Compose a key from an identifier and an optional label
    pub fn new(id: &str, label: Option<&str>) -> Self {
        Self(format!("{}: {}", id, label.unwrap_or(FALLBACK_LABEL)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geometry of an overlay in WGS84 (x = longitude, y = latitude)
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    Polygon(MultiPolygon<f64>),
    Point(Point<f64>),
}

/// A renderable feature bound to one record
#[derive(Debug, Clone)]
pub struct Overlay {
    key: OverlayKey,
    record: FeatureRecord,
    shape: OverlayShape,
    /// Set by highlighting only
    pub(crate) selected: bool,
}

impl Overlay {
    pub(crate) fn new(key: OverlayKey, record: FeatureRecord, shape: OverlayShape) -> Self {
        Self {
            key,
            record,
            shape,
            selected: false,
        }
    }

    #[inline]
    pub fn key(&self) -> &OverlayKey {
        &self.key
    }

    #[inline]
    pub fn record(&self) -> &FeatureRecord {
        &self.record
    }

    #[inline]
    pub fn shape(&self) -> &OverlayShape {
        &self.shape
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[inline]
    pub fn kind(&self) -> OverlayKind {
        match self.shape {
            OverlayShape::Polygon(_) => OverlayKind::Polygon,
            OverlayShape::Point(_) => OverlayKind::Point,
        }
    }

    /// Interaction state when the pointer is not over the overlay
    #[inline]
    pub fn resting_interaction(&self) -> Interaction {
        if self.selected {
            Interaction::Selected
        } else {
            Interaction::Idle
        }
    }

    /// Country and scale this overlay is grouped under
    pub fn group(&self) -> (&str, &str) {
        (
            self.record.country.as_deref().unwrap_or(UNSPECIFIED_GROUP),
            self.record.scale.as_deref().unwrap_or(UNSPECIFIED_GROUP),
        )
    }

    /// Text shown when hovering
    pub fn tooltip_text(&self) -> &str {
        self.record
            .location
            .as_deref()
            .unwrap_or("Location not found")
    }

    /// Whether a WGS84 position lies inside a polygon overlay
    ///
    /// Point markers have a screen-space size and are hit-tested by the renderer.
    pub fn contains(&self, position: &Point<f64>) -> bool {
        match &self.shape {
            OverlayShape::Polygon(polygons) => polygons.contains(position),
            OverlayShape::Point(_) => false,
        }
    }

    /// WGS84 bounding rectangle
    pub fn bounds(&self) -> Option<Rect<f64>> {
        match &self.shape {
            OverlayShape::Polygon(polygons) => polygons.bounding_rect(),
            OverlayShape::Point(point) => Some(Rect::new(point.0, point.0)),
        }
    }

    /// Anchor used for tooltips and centering
    pub fn anchor(&self) -> Option<Point<f64>> {
        match &self.shape {
            OverlayShape::Point(point) => Some(*point),
            OverlayShape::Polygon(_) => self.bounds().map(|rect| rect.center().into()),
        }
    }
}
