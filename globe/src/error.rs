//! Error types for the globe library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while merging, storing or rendering a global raster.
#[derive(Error, Debug)]
pub enum GlobeError {
    /// IO error without a known file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error on a specific file.
    #[error("IO error on {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tile ended in the middle of a row.
    #[error("Tile {name} holds {samples} samples, which is not a whole number of {cols}-sample rows")]
    PartialRow {
        name: String,
        samples: usize,
        cols: usize,
    },

    /// The raster file does not hold exactly one sample per grid cell.
    #[error("Invalid raster size: {size} bytes (expected {expected})")]
    RasterSize { size: u64, expected: u64 },

    /// A sample buffer does not match the grid it is meant to fill.
    #[error("Got {samples} samples, expected {expected}")]
    SampleCount { samples: usize, expected: usize },

    /// Requested output dimensions cannot be produced from the source region.
    #[error("Invalid dimensions: {width}x{height} from a {cols}x{rows} region")]
    InvalidDimensions {
        width: usize,
        height: usize,
        cols: usize,
        rows: usize,
    },

    /// A bounding box does not select any cell of the grid.
    #[error("Invalid bounds: lon {min_lon}..{max_lon}, lat {min_lat}..{max_lat}")]
    InvalidBounds {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },

    /// The tile table does not partition the grid.
    #[error("Invalid tile layout: {0}")]
    InvalidLayout(String),

    /// A buffer could not be allocated.
    #[error("Failed to allocate {samples} samples for the {what} buffer")]
    Allocation { what: &'static str, samples: usize },

    /// The image encoder rejected the pixel buffer.
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// The CSV writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl GlobeError {
    /// Attach a path to an IO error.
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GlobeError::FileIo {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`GlobeError`].
pub type Result<T> = std::result::Result<T, GlobeError>;
