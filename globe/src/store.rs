//! Persisting the global raster.
//!
//! The file format is a headerless run of native-endian `i16` samples, one
//! per grid cell in row-major order. The dimensions are implied by the grid
//! layout, so a file is only valid if its size is exactly `cells × 2` bytes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::Mmap;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{GlobeError, Result};
use crate::layout::GridLayout;
use crate::raster::{alloc_samples, GlobalRaster};

const SAMPLE_BYTES: usize = std::mem::size_of::<i16>();

/// Samples encoded per write call.
const WRITE_CHUNK: usize = 64 * 1024;

/// Create a temporary file next to `path` so it can be renamed over it.
pub(crate) fn temp_file_beside(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir).map_err(|e| GlobeError::file(dir, e))
}

/// Write `raster` to `path`.
///
/// The data goes to a temporary file in the same directory which replaces
/// `path` only once every sample has been written.
pub fn write_raster<P: AsRef<Path>>(path: P, raster: &GlobalRaster) -> Result<()> {
    let path = path.as_ref();
    let tmp = temp_file_beside(path)?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        let mut bytes = Vec::with_capacity(WRITE_CHUNK * SAMPLE_BYTES);
        for chunk in raster.as_slice().chunks(WRITE_CHUNK) {
            bytes.clear();
            bytes.extend(chunk.iter().flat_map(|s| s.to_ne_bytes()));
            writer
                .write_all(&bytes)
                .map_err(|e| GlobeError::file(tmp.path(), e))?;
        }
        writer.flush().map_err(|e| GlobeError::file(tmp.path(), e))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| GlobeError::file(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| GlobeError::file(path, e.error))?;

    debug!(path = %path.display(), cells = raster.as_slice().len(), "wrote raster");
    Ok(())
}

/// Read a raster written by [`write_raster`] for the given layout.
///
/// # Errors
///
/// Returns [`GlobeError::RasterSize`] unless the file holds exactly one
/// sample per cell of `layout`.
pub fn read_raster<P: AsRef<Path>>(path: P, layout: &GridLayout) -> Result<GlobalRaster> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GlobeError::file(path, e))?;
    let size = file.metadata().map_err(|e| GlobeError::file(path, e))?.len();
    let expected = (layout.cells() * SAMPLE_BYTES) as u64;

    if size != expected {
        return Err(GlobeError::RasterSize { size, expected });
    }

    let mut data = alloc_samples("global raster", layout.cells())?;
    if !data.is_empty() {
        // SAFETY: The file is opened read-only and the mapping does not
        // outlive this function.
        let mmap = unsafe { Mmap::map(&file).map_err(|e| GlobeError::file(path, e))? };
        for (dst, src) in data.iter_mut().zip(mmap.chunks_exact(SAMPLE_BYTES)) {
            *dst = i16::from_ne_bytes([src[0], src[1]]);
        }
    }

    debug!(path = %path.display(), bytes = size, "read raster");
    GlobalRaster::from_samples(layout.cols, layout.rows, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NO_DATA;
    use tempfile::TempDir;

    fn sample_raster(layout: &GridLayout) -> GlobalRaster {
        let data = (0..layout.cells())
            .map(|i| match i % 7 {
                0 => NO_DATA,
                1 => i16::MIN,
                2 => i16::MAX,
                _ => (i as i16).wrapping_mul(31),
            })
            .collect();
        GlobalRaster::from_samples(layout.cols, layout.rows, data).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("globe.bin");
        let layout = GridLayout::scaled(100).unwrap();
        let raster = sample_raster(&layout);

        write_raster(&path, &raster).unwrap();
        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            (layout.cells() * 2) as u64
        );

        let loaded = read_raster(&path, &layout).unwrap();
        assert_eq!(loaded, raster);
    }

    #[test]
    fn test_overwrite_replaces_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("globe.bin");
        std::fs::write(&path, b"stale").unwrap();
        let layout = GridLayout::scaled(1200).unwrap();
        let raster = sample_raster(&layout);

        write_raster(&path, &raster).unwrap();
        assert_eq!(read_raster(&path, &layout).unwrap(), raster);

        // Only the target remains; the temporary file was renamed.
        let entries = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_short_file_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("globe.bin");
        let layout = GridLayout::scaled(1200).unwrap();
        std::fs::write(&path, vec![0u8; layout.cells() * 2 - 2]).unwrap();

        match read_raster(&path, &layout) {
            Err(GlobeError::RasterSize { size, expected }) => {
                assert_eq!(size, 1294);
                assert_eq!(expected, 1296);
            }
            other => panic!("Expected RasterSize error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let layout = GridLayout::scaled(1200).unwrap();
        let result = read_raster("/nonexistent/globe.bin", &layout);
        assert!(matches!(result, Err(GlobeError::FileIo { .. })));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let layout = GridLayout::scaled(1200).unwrap();
        let raster = sample_raster(&layout);
        let result = write_raster("/nonexistent/dir/globe.bin", &raster);
        assert!(matches!(result, Err(GlobeError::FileIo { .. })));
    }
}
