//! Document Model
//! Read-only configuration the guideline core consumes: coordinate system,
//! guideline color and the current transformation

use serde::{Deserialize, Serialize};

use crate::transform::Transformation;

/// Coordinate system of the digitized plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordsType {
    #[default]
    Cartesian,
    Polar,
}

/// Named colors available for guideline rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPalette {
    #[default]
    Blue,
    Cyan,
    Gold,
    Green,
    Magenta,
    Orange,
    Red,
    Yellow,
}

impl ColorPalette {
    pub const ALL: [ColorPalette; 8] = [
        ColorPalette::Blue,
        ColorPalette::Cyan,
        ColorPalette::Gold,
        ColorPalette::Green,
        ColorPalette::Magenta,
        ColorPalette::Orange,
        ColorPalette::Red,
        ColorPalette::Yellow,
    ];

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ColorPalette::Blue => (64, 128, 255),
            ColorPalette::Cyan => (0, 200, 200),
            ColorPalette::Gold => (212, 175, 55),
            ColorPalette::Green => (64, 192, 64),
            ColorPalette::Magenta => (220, 64, 220),
            ColorPalette::Orange => (255, 150, 40),
            ColorPalette::Red => (230, 60, 60),
            ColorPalette::Yellow => (230, 230, 60),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorPalette::Blue => "Blue",
            ColorPalette::Cyan => "Cyan",
            ColorPalette::Gold => "Gold",
            ColorPalette::Green => "Green",
            ColorPalette::Magenta => "Magenta",
            ColorPalette::Orange => "Orange",
            ColorPalette::Red => "Red",
            ColorPalette::Yellow => "Yellow",
        }
    }
}

/// Snapshot of the document state the guideline collection reads from.
/// The collection never mutates it; it only reacts to refresh broadcasts.
#[derive(Debug, Clone, Default)]
pub struct DocumentModel {
    pub coords_type: CoordsType,
    pub guideline_color: ColorPalette,
    pub transformation: Transformation,
}

impl DocumentModel {
    pub fn new(
        coords_type: CoordsType,
        guideline_color: ColorPalette,
        transformation: Transformation,
    ) -> Self {
        Self {
            coords_type,
            guideline_color,
            transformation,
        }
    }
}
