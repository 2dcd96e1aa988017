//! Visual style presets for overlays
//!
//! Every overlay is drawn with one of a small, fixed set of styles. Which one
//! is a pure function of the overlay kind, its record status and whether it is
//! hovered or selected.

use serde::{Deserialize, Serialize};

/// RGBA colour, unmultiplied alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }
}

/// Stroke and fill used to draw one overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Outline colour
    pub stroke: Rgba,
    /// Outline width in pixels
    pub weight: f32,
    /// Fill colour (alpha is the fill opacity)
    pub fill: Rgba,
}

impl OverlayStyle {
    pub const fn new(stroke: Rgba, weight: f32, fill: Rgba) -> Self {
        Self {
            stroke,
            weight,
            fill,
        }
    }
}

/// What an overlay is drawn as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Polygon,
    Point,
}

/// The named styles an overlay can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleVariant {
    Normal,
    PrePlanning,
    Highlighted,
    Mouseover,
}

/// Pointer/selection state of an overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Idle,
    Hovered,
    Selected,
}

/// Pick the style variant for an overlay
///
/// Selection wins over hover; the status only matters while idle.
#[inline]
pub fn style_variant(pre_planning: bool, interaction: Interaction) -> StyleVariant {
    match interaction {
        Interaction::Selected => StyleVariant::Highlighted,
        Interaction::Hovered => StyleVariant::Mouseover,
        Interaction::Idle if pre_planning => StyleVariant::PrePlanning,
        Interaction::Idle => StyleVariant::Normal,
    }
}

/// One style per variant for a single overlay kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    pub normal: OverlayStyle,
    pub pre_planning: OverlayStyle,
    pub highlighted: OverlayStyle,
    pub mouseover: OverlayStyle,
}

impl StyleSet {
    #[inline]
    pub fn get(&self, variant: StyleVariant) -> OverlayStyle {
        match variant {
            StyleVariant::Normal => self.normal,
            StyleVariant::PrePlanning => self.pre_planning,
            StyleVariant::Highlighted => self.highlighted,
            StyleVariant::Mouseover => self.mouseover,
        }
    }
}

/// Style presets for polygons and point markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePresets {
    pub polygon: StyleSet,
    pub point: StyleSet,
}

impl StylePresets {
    #[inline]
    pub fn resolve(&self, kind: OverlayKind, variant: StyleVariant) -> OverlayStyle {
        match kind {
            OverlayKind::Polygon => self.polygon.get(variant),
            OverlayKind::Point => self.point.get(variant),
        }
    }
}

impl Default for StylePresets {
    fn default() -> Self {
        const BLUE: Rgba = Rgba::new(31, 120, 180, 230);
        const ORANGE: Rgba = Rgba::new(230, 120, 30, 230);
        const YELLOW: Rgba = Rgba::new(255, 204, 0, 255);
        const PALE: Rgba = Rgba::new(166, 206, 227, 255);
        const WHITE: Rgba = Rgba::new(255, 255, 255, 230);

        Self {
            polygon: StyleSet {
                normal: OverlayStyle::new(BLUE, 1.5, Rgba::new(31, 120, 180, 70)),
                pre_planning: OverlayStyle::new(ORANGE, 1.5, Rgba::new(230, 120, 30, 60)),
                highlighted: OverlayStyle::new(YELLOW, 3.0, Rgba::new(255, 204, 0, 110)),
                mouseover: OverlayStyle::new(PALE, 2.0, Rgba::new(166, 206, 227, 120)),
            },
            point: StyleSet {
                normal: OverlayStyle::new(WHITE, 1.0, Rgba::new(31, 120, 180, 200)),
                pre_planning: OverlayStyle::new(WHITE, 1.0, Rgba::new(230, 120, 30, 200)),
                highlighted: OverlayStyle::new(Rgba::new(60, 60, 60, 255), 2.0, YELLOW),
                mouseover: OverlayStyle::new(WHITE, 1.5, PALE),
            },
        }
    }
}
