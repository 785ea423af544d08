//! Merging tiles into the global raster.
//!
//! A tile is a horizontal quarter of one latitude band, so its rows are
//! narrower than global rows. Each tile row `i` lands at global row
//! `row_offset + i`, starting at column `col_offset`.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{GlobeError, Result};
use crate::layout::{GridLayout, TileDescriptor};
use crate::raster::GlobalRaster;
use crate::stats::SampleStats;
use crate::tile::{read_tile, scratch_buffer};

/// Per-tile outcome of a merge.
#[derive(Debug, Clone)]
pub struct TileReport {
    pub tile: TileDescriptor,
    /// Samples read from the file.
    pub samples: usize,
    /// Complete rows copied into the raster.
    pub rows_copied: usize,
    pub stats: SampleStats,
}

/// Result of [`merge_tiles`].
#[derive(Debug)]
pub struct MergeReport {
    pub raster: GlobalRaster,
    pub tiles: Vec<TileReport>,
    /// Statistics over the whole merged raster.
    pub stats: SampleStats,
}

/// Copy the first `samples` values of `data` into the tile's rectangle.
///
/// Returns the number of rows copied. Fails if `samples` ends mid-row.
pub fn place_tile(
    raster: &mut GlobalRaster,
    tile: &TileDescriptor,
    data: &[i16],
    samples: usize,
) -> Result<usize> {
    if tile.num_cols == 0 {
        return Ok(0);
    }
    let samples = samples.min(data.len());
    if samples % tile.num_cols != 0 {
        return Err(GlobeError::PartialRow {
            name: tile.name.to_string(),
            samples,
            cols: tile.num_cols,
        });
    }
    let rows = (samples / tile.num_cols).min(tile.num_rows);
    let stride = raster.cols();

    if tile.row_offset + rows > raster.rows() || tile.col_offset + tile.num_cols > stride {
        return Err(GlobeError::InvalidLayout(format!(
            "tile {} does not fit a {}x{} raster",
            tile.name,
            stride,
            raster.rows()
        )));
    }

    let dst = raster.as_mut_slice();
    for (i, row) in data[..rows * tile.num_cols]
        .chunks_exact(tile.num_cols)
        .enumerate()
    {
        let start = (tile.row_offset + i) * stride + tile.col_offset;
        dst[start..start + tile.num_cols].copy_from_slice(row);
    }

    Ok(rows)
}

/// Read every tile of `layout` from `data_dir` and assemble the global raster.
///
/// Tiles are processed in declaration order through a single scratch buffer.
/// `on_tile` is called after each tile has been placed. Any error aborts the
/// whole merge.
pub fn merge_tiles<P, F>(layout: &GridLayout, data_dir: P, mut on_tile: F) -> Result<MergeReport>
where
    P: AsRef<Path>,
    F: FnMut(&TileReport),
{
    layout.validate()?;

    let data_dir = data_dir.as_ref();
    let mut scratch = scratch_buffer(layout.max_tile_samples())?;
    let mut raster = GlobalRaster::zeroed(layout)?;
    let mut tiles = Vec::with_capacity(layout.tiles.len());

    for tile in &layout.tiles {
        let samples = read_tile(data_dir.join(tile.name), tile, &mut scratch)?;
        let rows_copied = place_tile(&mut raster, tile, &scratch, samples)?;
        let stats = SampleStats::compute(&scratch[..samples]);

        info!(
            name = tile.name,
            count = samples,
            mean = stats.legacy_mean().unwrap_or(0.0),
            valid_mean = stats.mean().unwrap_or(0.0),
            min = stats.min,
            max = stats.max,
            "merged tile"
        );
        if rows_copied < tile.num_rows {
            warn!(
                name = tile.name,
                rows = rows_copied,
                expected = tile.num_rows,
                "tile is short; missing rows left at zero"
            );
        }

        let report = TileReport {
            tile: *tile,
            samples,
            rows_copied,
            stats,
        };
        on_tile(&report);
        tiles.push(report);
    }

    let stats = raster.stats();
    info!(
        name = "GLOBE",
        count = stats.total,
        mean = stats.legacy_mean().unwrap_or(0.0),
        valid_mean = stats.mean().unwrap_or(0.0),
        min = stats.min,
        max = stats.max,
        "merged globe"
    );

    Ok(MergeReport {
        raster,
        tiles,
        stats,
    })
}
