//! The merged global elevation grid.

use crate::error::{GlobeError, Result};
use crate::layout::{CellRegion, GridLayout};
use crate::stats::SampleStats;

/// Allocate a zero-filled sample buffer, reporting failure instead of aborting.
pub(crate) fn alloc_samples(what: &'static str, samples: usize) -> Result<Vec<i16>> {
    let mut data = Vec::new();
    data.try_reserve_exact(samples)
        .map_err(|_| GlobeError::Allocation { what, samples })?;
    data.resize(samples, 0);
    Ok(data)
}

/// A dense, row-major grid of elevation samples.
///
/// `data[row * cols + col]` is the sample at `(row, col)`; row 0 is the north
/// edge and column 0 the antimeridian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalRaster {
    cols: usize,
    rows: usize,
    data: Vec<i16>,
}

impl GlobalRaster {
    /// A zero-filled raster with the dimensions of `layout`.
    pub fn zeroed(layout: &GridLayout) -> Result<Self> {
        Ok(Self {
            cols: layout.cols,
            rows: layout.rows,
            data: alloc_samples("global raster", layout.cells())?,
        })
    }

    /// Wrap existing samples. `data` must hold exactly `cols * rows` values.
    pub fn from_samples(cols: usize, rows: usize, data: Vec<i16>) -> Result<Self> {
        if data.len() != cols * rows {
            return Err(GlobeError::SampleCount {
                samples: data.len(),
                expected: cols * rows,
            });
        }
        Ok(Self { cols, rows, data })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Sample at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<i16> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// One full row of samples.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[i16] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// The part of `row` that lies inside `region`.
    pub(crate) fn region_row(&self, region: &CellRegion, y: usize) -> &[i16] {
        let start = (region.top + y) * self.cols + region.left;
        &self.data[start..start + region.cols]
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [i16] {
        &mut self.data
    }

    /// Statistics over every cell.
    pub fn stats(&self) -> SampleStats {
        SampleStats::compute(&self.data)
    }

    /// Whether `region` fits inside the grid.
    pub fn contains(&self, region: &CellRegion) -> bool {
        region.top + region.rows <= self.rows && region.left + region.cols <= self.cols
    }

    /// The region covering the whole raster.
    pub fn full_region(&self) -> CellRegion {
        CellRegion {
            top: 0,
            left: 0,
            rows: self.rows,
            cols: self.cols,
        }
    }
}
