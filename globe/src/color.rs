//! Elevation to color mapping.
//!
//! Two palettes are available:
//!
//! - **Terrain**: fixed colors for elevation bands, from water to snow.
//! - **Greyscale**: a linear ramp from -500m (black) to 8500m (white).
//!
//! [`NO_DATA`] cells always map to [`NO_DATA_COLOR`].

use std::fmt;
use std::str::FromStr;

use crate::layout::NO_DATA;

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Color of cells without data.
pub const NO_DATA_COLOR: Rgb = [10, 20, 140];

pub const WATER: Rgb = [10, 20, 140];
pub const BEACH: Rgb = [130, 98, 95];
pub const SAND: Rgb = [107, 128, 75];
pub const LOWLAND: Rgb = [100, 200, 100];
pub const MIDLAND: Rgb = [40, 140, 50];
pub const HIGHLAND: Rgb = [40, 120, 60];
pub const MOUNTAIN: Rgb = [145, 145, 145];
pub const SNOW: Rgb = [255, 255, 255];

/// Inclusive upper bound of each terrain band, lowest first.
const TERRAIN_BANDS: [(i16, Rgb); 7] = [
    (0, WATER),
    (5, BEACH),
    (50, SAND),
    (250, LOWLAND),
    (900, MIDLAND),
    (1000, HIGHLAND),
    (1800, MOUNTAIN),
];

/// Lowest elevation of the greyscale ramp.
const GREY_FLOOR: i32 = -500;

/// Elevation span of the greyscale ramp.
const GREY_SPAN: i32 = 9000;

/// Which color scheme to render with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Palette {
    /// Banded land-cover style colors.
    #[default]
    Terrain,
    /// Linear grey ramp.
    Greyscale,
}

impl Palette {
    /// Color for an elevation in meters.
    pub fn to_rgb(self, value: i16) -> Rgb {
        if value == NO_DATA {
            return NO_DATA_COLOR;
        }
        match self {
            Palette::Terrain => terrain(value),
            Palette::Greyscale => greyscale(value),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Palette::Terrain => write!(f, "terrain"),
            Palette::Greyscale => write!(f, "greyscale"),
        }
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terrain" => Ok(Palette::Terrain),
            "greyscale" | "grayscale" | "grey" | "gray" => Ok(Palette::Greyscale),
            other => Err(format!(
                "unknown palette '{}', expected 'terrain' or 'greyscale'",
                other
            )),
        }
    }
}

/// Terrain band color. The first band whose upper bound is not exceeded wins.
pub fn terrain(value: i16) -> Rgb {
    TERRAIN_BANDS
        .iter()
        .find(|(upper, _)| value <= *upper)
        .map_or(SNOW, |&(_, color)| color)
}

/// Grey level for `value`, clamped to the 0..=255 range.
pub fn greyscale(value: i16) -> Rgb {
    let grey = ((i32::from(value) - GREY_FLOOR) * 255 / GREY_SPAN).clamp(0, 255) as u8;
    [grey, grey, grey]
}
