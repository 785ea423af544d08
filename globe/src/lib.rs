//! # globe - GLOBE Elevation Raster Library
//!
//! Assembles the sixteen NOAA GLOBE 30 arc-second tiles into one global
//! elevation raster, persists it as a flat binary file, and turns it back
//! into PNG images or `lon,lat,elev` tables.
//!
//! ## Quick Start
//!
//! ```ignore
//! use globe::{merge, render, store, GridLayout, RenderOptions};
//!
//! let layout = GridLayout::globe();
//! let report = merge::merge_tiles(&layout, "/data/globe", |_| {})?;
//! store::write_raster("globe.bin", &report.raster)?;
//!
//! let raster = store::read_raster("globe.bin", &layout)?;
//! let pixels = render::render(&raster, &RenderOptions::new(800, 800))?;
//! render::write_png(&pixels, "globe.png")?;
//! ```
//!
//! ## Data Format
//!
//! - **Tiles** (`all10/a10g` .. `all10/p10g`): headerless native-endian
//!   `i16` samples, 10800 columns by 4800 or 6000 rows.
//! - **Global raster**: headerless native-endian `i16`, 43200 × 21600
//!   samples, row 0 at 90°N and column 0 at 180°W.
//!
//! The value -500 ([`NO_DATA`]) marks cells without a measurement.
//!
//! ## Data Sources
//!
//! - <https://www.ngdc.noaa.gov/mgg/topo/globe.html>

pub mod color;
pub mod error;
pub mod layout;
pub mod merge;
pub mod raster;
pub mod render;
pub mod stats;
pub mod store;
pub mod table;
pub mod tile;

// Re-export main types at crate root for convenience
pub use color::{Palette, Rgb, NO_DATA_COLOR};
pub use error::{GlobeError, Result};
pub use layout::{
    BoundingBox, CellRegion, GridLayout, TileDescriptor, GLOBE_CELLS, GLOBE_COLS, GLOBE_ROWS,
    GLOBE_TILES, MAX_TILE_SAMPLES, NO_DATA,
};
pub use merge::{MergeReport, TileReport};
pub use raster::GlobalRaster;
pub use render::{PixelBuffer, RenderOptions, Sampling};
pub use stats::SampleStats;
pub use table::TableMode;
