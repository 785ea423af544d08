//! Grid geometry and the GLOBE tile table.
//!
//! The global grid is 43200 × 21600 cells at 1/120° per cell. Row 0 is the
//! north edge (90°N) and column 0 the west edge (180°W):
//!
//! ```text
//! lon = -180 + col * cell_size
//! lat =   90 - row * cell_size
//! ```
//!
//! The sixteen GLOBE tiles cover it as four latitude bands of four 90°-wide
//! tiles each. The polar bands (a-d, m-p) are 4800 rows tall, the two
//! mid-latitude bands (e-h, i-l) 6000 rows.

use serde::Serialize;

use crate::error::{GlobeError, Result};

/// Columns of the global grid.
pub const GLOBE_COLS: usize = 43200;

/// Rows of the global grid.
pub const GLOBE_ROWS: usize = 21600;

/// Cells of the global grid.
pub const GLOBE_CELLS: usize = GLOBE_COLS * GLOBE_ROWS;

/// Samples in the largest tile (10800 × 6000).
pub const MAX_TILE_SAMPLES: usize = 10800 * 6000;

/// Value marking a cell without a measurement.
pub const NO_DATA: i16 = -500;

/// Largest tile dimension divisor that keeps every tile an integer size.
const TILE_UNIT: usize = 1200;

/// Longitude and latitude of `(row, col)` in a global grid `cols` cells wide.
pub(crate) fn cell_coords(cols: usize, row: usize, col: usize) -> (f64, f64) {
    let cell_size = 360.0 / cols as f64;
    (
        -180.0 + col as f64 * cell_size,
        90.0 - row as f64 * cell_size,
    )
}

/// Position and size of one tile within the global grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileDescriptor {
    /// Path of the tile file relative to the data directory.
    pub name: &'static str,
    pub num_cols: usize,
    pub num_rows: usize,
    /// First global row covered by the tile.
    pub row_offset: usize,
    /// First global column covered by the tile.
    pub col_offset: usize,
}

impl TileDescriptor {
    const fn new(
        name: &'static str,
        num_rows: usize,
        row_offset: usize,
        col_offset: usize,
    ) -> Self {
        Self {
            name,
            num_cols: 10800,
            num_rows,
            row_offset,
            col_offset,
        }
    }

    /// Number of samples the tile declares.
    pub fn cells(&self) -> usize {
        self.num_cols * self.num_rows
    }

    /// Declared file size in bytes.
    pub fn expected_bytes(&self) -> u64 {
        (self.cells() * std::mem::size_of::<i16>()) as u64
    }

    fn overlaps(&self, other: &TileDescriptor) -> bool {
        self.row_offset < other.row_offset + other.num_rows
            && other.row_offset < self.row_offset + self.num_rows
            && self.col_offset < other.col_offset + other.num_cols
            && other.col_offset < self.col_offset + self.num_cols
    }
}

/// The GLOBE 30 arc-second tiles, in merge order.
pub const GLOBE_TILES: [TileDescriptor; 16] = [
    TileDescriptor::new("all10/a10g", 4800, 0, 0),
    TileDescriptor::new("all10/b10g", 4800, 0, 10800),
    TileDescriptor::new("all10/c10g", 4800, 0, 21600),
    TileDescriptor::new("all10/d10g", 4800, 0, 32400),
    TileDescriptor::new("all10/e10g", 6000, 4800, 0),
    TileDescriptor::new("all10/f10g", 6000, 4800, 10800),
    TileDescriptor::new("all10/g10g", 6000, 4800, 21600),
    TileDescriptor::new("all10/h10g", 6000, 4800, 32400),
    TileDescriptor::new("all10/i10g", 6000, 10800, 0),
    TileDescriptor::new("all10/j10g", 6000, 10800, 10800),
    TileDescriptor::new("all10/k10g", 6000, 10800, 21600),
    TileDescriptor::new("all10/l10g", 6000, 10800, 32400),
    TileDescriptor::new("all10/m10g", 4800, 16800, 0),
    TileDescriptor::new("all10/n10g", 4800, 16800, 10800),
    TileDescriptor::new("all10/o10g", 4800, 16800, 21600),
    TileDescriptor::new("all10/p10g", 4800, 16800, 32400),
];

/// A geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western boundary longitude.
    pub min_lon: f64,
    /// Southern boundary latitude.
    pub min_lat: f64,
    /// Eastern boundary longitude.
    pub max_lon: f64,
    /// Northern boundary latitude.
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    fn invalid(&self) -> GlobeError {
        GlobeError::InvalidBounds {
            min_lon: self.min_lon,
            min_lat: self.min_lat,
            max_lon: self.max_lon,
            max_lat: self.max_lat,
        }
    }
}

/// A rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRegion {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl CellRegion {
    /// Number of cells in the region.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// Grid dimensions plus the tiles that cover them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    pub tiles: Vec<TileDescriptor>,
}

impl GridLayout {
    /// The full-resolution GLOBE layout.
    pub fn globe() -> Self {
        Self {
            cols: GLOBE_COLS,
            rows: GLOBE_ROWS,
            tiles: GLOBE_TILES.to_vec(),
        }
    }

    /// The GLOBE layout with every dimension and offset divided by `divisor`.
    ///
    /// Keeps the sixteen-tile geometry at a size small enough for tests and
    /// benchmarks. `divisor` must divide 1200.
    pub fn scaled(divisor: usize) -> Result<Self> {
        if divisor == 0 || TILE_UNIT % divisor != 0 {
            return Err(GlobeError::InvalidLayout(format!(
                "scale divisor {} does not divide {}",
                divisor, TILE_UNIT
            )));
        }

        let tiles = GLOBE_TILES
            .iter()
            .map(|t| TileDescriptor {
                name: t.name,
                num_cols: t.num_cols / divisor,
                num_rows: t.num_rows / divisor,
                row_offset: t.row_offset / divisor,
                col_offset: t.col_offset / divisor,
            })
            .collect();

        Ok(Self {
            cols: GLOBE_COLS / divisor,
            rows: GLOBE_ROWS / divisor,
            tiles,
        })
    }

    /// Number of cells in the grid.
    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }

    /// Angular size of one cell in degrees.
    pub fn cell_size(&self) -> f64 {
        360.0 / self.cols as f64
    }

    /// Samples in the largest tile, i.e. the scratch buffer size a merge needs.
    pub fn max_tile_samples(&self) -> usize {
        self.tiles.iter().map(TileDescriptor::cells).max().unwrap_or(0)
    }

    /// The region covering the whole grid.
    pub fn full_region(&self) -> CellRegion {
        CellRegion {
            top: 0,
            left: 0,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Check that the tiles cover every cell exactly once.
    ///
    /// Every tile must lie inside the grid, no two tiles may overlap, and
    /// the tile areas must add up to the grid area.
    pub fn validate(&self) -> Result<()> {
        let mut covered = 0usize;

        for (i, tile) in self.tiles.iter().enumerate() {
            if tile.num_cols == 0 || tile.num_rows == 0 {
                return Err(GlobeError::InvalidLayout(format!(
                    "tile {} is empty",
                    tile.name
                )));
            }
            if tile.row_offset + tile.num_rows > self.rows
                || tile.col_offset + tile.num_cols > self.cols
            {
                return Err(GlobeError::InvalidLayout(format!(
                    "tile {} extends past the {}x{} grid",
                    tile.name, self.cols, self.rows
                )));
            }
            if let Some(other) = self.tiles[..i].iter().find(|o| o.overlaps(tile)) {
                return Err(GlobeError::InvalidLayout(format!(
                    "tiles {} and {} overlap",
                    other.name, tile.name
                )));
            }
            covered += tile.cells();
        }

        if covered != self.cells() {
            return Err(GlobeError::InvalidLayout(format!(
                "tiles cover {} of {} cells",
                covered,
                self.cells()
            )));
        }

        Ok(())
    }

    /// Longitude and latitude of a cell, in degrees.
    pub fn cell_to_lon_lat(&self, row: usize, col: usize) -> (f64, f64) {
        cell_coords(self.cols, row, col)
    }

    /// The cell containing a coordinate, or `None` outside the grid.
    pub fn lon_lat_to_cell(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        if !(-180.0..180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) || lat == -90.0 {
            return None;
        }
        let col = ((lon + 180.0) * self.cols as f64 / 360.0).floor() as usize;
        let row = ((90.0 - lat) * self.rows as f64 / 180.0).floor() as usize;
        Some((row.min(self.rows - 1), col.min(self.cols - 1)))
    }

    /// The smallest cell region containing a bounding box, clipped to the grid.
    pub fn region(&self, bbox: &BoundingBox) -> Result<CellRegion> {
        if !(bbox.min_lon < bbox.max_lon && bbox.min_lat < bbox.max_lat) {
            return Err(bbox.invalid());
        }

        let cols = self.cols as f64;
        let rows = self.rows as f64;
        let left = ((bbox.min_lon + 180.0) * cols / 360.0).floor().clamp(0.0, cols);
        let right = ((bbox.max_lon + 180.0) * cols / 360.0).ceil().clamp(0.0, cols);
        let top = ((90.0 - bbox.max_lat) * rows / 180.0).floor().clamp(0.0, rows);
        let bottom = ((90.0 - bbox.min_lat) * rows / 180.0).ceil().clamp(0.0, rows);

        if right <= left || bottom <= top {
            return Err(bbox.invalid());
        }

        Ok(CellRegion {
            top: top as usize,
            left: left as usize,
            rows: (bottom - top) as usize,
            cols: (right - left) as usize,
        })
    }
}
