//! Map canvas seam
//!
//! The controller only ever asks the canvas to add, remove and restyle layers
//! and to show or hide a tooltip. [`MapScene`] keeps the result of those
//! requests so a renderer can draw it every frame.

use crate::{OverlayKey, OverlayStyle};
use geo::Point;
use std::collections::{HashMap, HashSet};

/// Requests the controller issues against the map
pub trait MapCanvas {
    /// Show a layer. Adding a layer that is already shown has no effect.
    fn add_layer(&mut self, key: &OverlayKey);

    /// Hide a layer. Removing a hidden layer has no effect.
    fn remove_layer(&mut self, key: &OverlayKey);

    fn has_layer(&self, key: &OverlayKey) -> bool;

    fn set_style(&mut self, key: &OverlayKey, style: OverlayStyle);

    /// Radius of a point marker in pixels
    fn set_radius(&mut self, key: &OverlayKey, radius: f64);

    fn show_tooltip(&mut self, text: &str, anchor: Point<f64>);

    fn hide_tooltip(&mut self);

    /// Forget every layer, style and tooltip
    fn clear(&mut self);
}

/// Tooltip currently shown on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    /// WGS84 position (x = longitude, y = latitude)
    pub anchor: Point<f64>,
}

/// Retained canvas state
#[derive(Debug, Clone, Default)]
pub struct MapScene {
    visible: HashSet<OverlayKey>,
    styles: HashMap<OverlayKey, OverlayStyle>,
    radii: HashMap<OverlayKey, f64>,
    tooltip: Option<Tooltip>,
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn style(&self, key: &OverlayKey) -> Option<OverlayStyle> {
        self.styles.get(key).copied()
    }

    #[inline]
    pub fn radius(&self, key: &OverlayKey) -> Option<f64> {
        self.radii.get(key).copied()
    }

    #[inline]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Number of layers currently shown
    #[inline]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

impl MapCanvas for MapScene {
    fn add_layer(&mut self, key: &OverlayKey) {
        if !self.visible.contains(key) {
            self.visible.insert(key.clone());
        }
    }

    fn remove_layer(&mut self, key: &OverlayKey) {
        self.visible.remove(key);
    }

    fn has_layer(&self, key: &OverlayKey) -> bool {
        self.visible.contains(key)
    }

    fn set_style(&mut self, key: &OverlayKey, style: OverlayStyle) {
        self.styles.insert(key.clone(), style);
    }

    fn set_radius(&mut self, key: &OverlayKey, radius: f64) {
        self.radii.insert(key.clone(), radius);
    }

    fn show_tooltip(&mut self, text: &str, anchor: Point<f64>) {
        self.tooltip = Some(Tooltip {
            text: text.to_string(),
            anchor,
        });
    }

    fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }

    fn clear(&mut self) {
        self.visible.clear();
        self.styles.clear();
        self.radii.clear();
        self.tooltip = None;
    }
}
