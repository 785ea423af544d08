//! Rendering the global raster to RGB pixels and PNG files.
//!
//! [`render`] walks a region of the raster row by row and colors each cell
//! through a [`Palette`]. When the output is smaller than the region there
//! are two ways to fit it:
//!
//! - [`Sampling::Crop`] keeps the top-left `width × height` cells.
//! - [`Sampling::Resample`] picks the nearest cell for each pixel, covering
//!   the whole region.

use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::debug;

use crate::color::{Palette, Rgb};
use crate::error::{GlobeError, Result};
use crate::layout::CellRegion;
use crate::raster::GlobalRaster;
use crate::store::temp_file_beside;

const CHANNELS: usize = 3;

/// How to map a region onto an output of a different size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sampling {
    /// Take the first `width` columns of the first `height` rows.
    #[default]
    Crop,
    /// Nearest-neighbour resampling of the whole region.
    Resample,
}

/// Parameters for [`render`].
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub width: usize,
    pub height: usize,
    pub palette: Palette,
    pub sampling: Sampling,
    /// Cells to draw; the whole raster when `None`.
    pub region: Option<CellRegion>,
}

impl RenderOptions {
    /// Crop a `width × height` image from the whole raster with the terrain palette.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            palette: Palette::default(),
            sampling: Sampling::default(),
            region: None,
        }
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn region(mut self, region: CellRegion) -> Self {
        self.region = Some(region);
        self
    }
}

/// Packed RGB8 pixels, row stride `width * 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width * CHANNELS
    }

    /// Color of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.stride() + x * CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

fn invalid(options: &RenderOptions, region: &CellRegion) -> GlobeError {
    GlobeError::InvalidDimensions {
        width: options.width,
        height: options.height,
        cols: region.cols,
        rows: region.rows,
    }
}

/// Source index for output index `i` when `src` cells are spread over `dst` pixels.
fn nearest(i: usize, dst: usize, src: usize) -> usize {
    (i as u128 * src as u128 / dst as u128) as usize
}

/// Color a region of `raster` into a pixel buffer.
///
/// # Errors
///
/// - [`GlobeError::InvalidDimensions`] if the output is empty or too large
///   to address, if the region lies outside the raster, or if cropping asks
///   for more pixels than the region has.
/// - [`GlobeError::Allocation`] if the pixel buffer cannot be allocated.
pub fn render(raster: &GlobalRaster, options: &RenderOptions) -> Result<PixelBuffer> {
    let region = options.region.unwrap_or_else(|| raster.full_region());
    let (width, height) = (options.width, options.height);

    if width == 0 || height == 0 || region.cells() == 0 || !raster.contains(&region) {
        return Err(invalid(options, &region));
    }
    if options.sampling == Sampling::Crop && (width > region.cols || height > region.rows) {
        return Err(invalid(options, &region));
    }

    let len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| invalid(options, &region))?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| GlobeError::Allocation {
            what: "pixel",
            samples: len,
        })?;

    // Source column for each output column; identical for every row.
    let columns: Vec<usize> = match options.sampling {
        Sampling::Crop => (0..width).collect(),
        Sampling::Resample => (0..width)
            .map(|x| nearest(x, width, region.cols))
            .collect(),
    };

    for y in 0..height {
        let src_y = match options.sampling {
            Sampling::Crop => y,
            Sampling::Resample => nearest(y, height, region.rows),
        };
        let row = raster.region_row(&region, src_y);
        for &x in &columns {
            data.extend_from_slice(&options.palette.to_rgb(row[x]));
        }
    }

    debug!(
        width,
        height,
        top = region.top,
        left = region.left,
        rows = region.rows,
        cols = region.cols,
        palette = %options.palette,
        "rendered region"
    );

    Ok(PixelBuffer {
        width,
        height,
        data,
    })
}

/// Encode `pixels` as an RGB PNG at `path`.
///
/// The image is written to a temporary file first and renamed into place.
pub fn write_png<P: AsRef<Path>>(pixels: &PixelBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = match (u32::try_from(pixels.width), u32::try_from(pixels.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(GlobeError::InvalidDimensions {
                width: pixels.width,
                height: pixels.height,
                cols: u32::MAX as usize,
                rows: u32::MAX as usize,
            })
        }
    };

    let tmp = temp_file_beside(path)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        PngEncoder::new(&mut writer).write_image(
            &pixels.data,
            width,
            height,
            ExtendedColorType::Rgb8,
        )?;
        writer
            .flush()
            .map_err(|e| GlobeError::file(tmp.path(), e))?;
    }
    tmp.persist(path)
        .map_err(|e| GlobeError::file(path, e.error))?;

    debug!(path = %path.display(), width, height, "wrote png");
    Ok(())
}
