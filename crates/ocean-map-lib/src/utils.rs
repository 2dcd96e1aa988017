//! Utility functions for coordinates, marker sizing and bounds

use geo::{Coord, Point, Rect};

/// Base of the marker growth curve.
///
/// Tiles double in scale per zoom level; markers grow by this factor instead so
/// they shrink relative to the geography at close range.
pub const MARKER_GROWTH_BASE: f64 = 1.7;

/// Lowest and highest zoom a fitted view may use
pub const MIN_FIT_ZOOM: f64 = 1.0;
pub const MAX_FIT_ZOOM: f64 = 18.0;

/// Build a WGS84 point from latitude and longitude in degrees
///
/// Points follow the GeoJSON axis order: x is longitude, y is latitude.
#[inline(always)]
pub fn lat_lon(lat: f64, lon: f64) -> Point<f64> {
    Point::new(lon, lat)
}

/// Point marker radius in pixels for a zoom level
#[inline]
pub fn radius_for_zoom(zoom: f64) -> f64 {
    MARKER_GROWTH_BASE.powf(zoom) / 2.0
}

/// Smallest rectangle containing both inputs
#[inline]
pub fn union_rect(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

/// Estimate a zoom level that fits a WGS84 rectangle on screen
pub fn zoom_to_fit(bounds: Rect<f64>) -> f64 {
    let max_span = bounds.width().abs().max(bounds.height().abs());
    if max_span > 0.0 {
        let zoom_estimate = (4.0 * 360.0 / max_span).log2();
        (zoom_estimate - 0.5).clamp(MIN_FIT_ZOOM, MAX_FIT_ZOOM)
    } else {
        12.0
    }
}
