//! Reading GLOBE tile files.
//!
//! A tile file is a headerless run of native-endian `i16` samples in
//! row-major order. Files are sometimes shorter than their declared
//! `num_cols × num_rows`, so the reader reports how many samples it found.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::error::{GlobeError, Result};
use crate::layout::TileDescriptor;
use crate::raster::alloc_samples;

const SAMPLE_BYTES: usize = std::mem::size_of::<i16>();

/// Allocate a scratch buffer for [`read_tile`].
pub fn scratch_buffer(samples: usize) -> Result<Vec<i16>> {
    alloc_samples("tile scratch", samples)
}

/// Read one tile into the front of `buf`.
///
/// Reads at most `tile.cells()` samples and at most `buf.len()`. Returns the
/// number of samples read; `buf[..n]` is valid until the next call, anything
/// past it is left as it was. A trailing odd byte is ignored.
///
/// # Errors
///
/// Returns [`GlobeError::FileIo`] if the file cannot be opened or mapped.
pub fn read_tile<P: AsRef<Path>>(path: P, tile: &TileDescriptor, buf: &mut [i16]) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GlobeError::file(path, e))?;
    let file_len = file
        .metadata()
        .map_err(|e| GlobeError::file(path, e))?
        .len() as usize;

    let available = file_len / SAMPLE_BYTES;
    let count = available.min(tile.cells()).min(buf.len());
    debug!(
        tile = tile.name,
        bytes = file_len,
        declared = tile.cells(),
        count,
        "reading tile"
    );

    if count == 0 {
        return Ok(0);
    }

    // SAFETY: The file is opened read-only and the mapping is dropped before
    // returning. Tile files are not expected to change while a merge runs.
    let mmap = unsafe { Mmap::map(&file).map_err(|e| GlobeError::file(path, e))? };

    for (dst, src) in buf[..count]
        .iter_mut()
        .zip(mmap.chunks_exact(SAMPLE_BYTES))
    {
        *dst = i16::from_ne_bytes([src[0], src[1]]);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tile(num_cols: usize, num_rows: usize) -> TileDescriptor {
        TileDescriptor {
            name: "test",
            num_cols,
            num_rows,
            row_offset: 0,
            col_offset: 0,
        }
    }

    fn write_samples(samples: &[i16]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for s in samples {
            file.write_all(&s.to_ne_bytes()).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_full_tile() {
        let file = write_samples(&[1, -2, 300, -500, 8848, 0]);
        let mut buf = vec![0i16; 10];

        let n = read_tile(file.path(), &tile(3, 2), &mut buf).unwrap();
        assert_eq!(n, 6);
        assert_eq!(&buf[..6], &[1, -2, 300, -500, 8848, 0]);
        assert_eq!(&buf[6..], &[0; 4]);
    }

    #[test]
    fn test_short_file_reports_available_samples() {
        let file = write_samples(&[5, 6, 7]);
        let mut buf = vec![0i16; 10];

        let n = read_tile(file.path(), &tile(3, 2), &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..3], &[5, 6, 7]);
    }

    #[test]
    fn test_long_file_is_capped_at_declared_size() {
        let file = write_samples(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut buf = vec![0i16; 10];

        let n = read_tile(file.path(), &tile(2, 2), &mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..5], &[1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_small_buffer_caps_read() {
        let file = write_samples(&[1, 2, 3, 4]);
        let mut buf = vec![0i16; 3];

        let n = read_tile(file.path(), &tile(2, 2), &mut buf).unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn test_odd_trailing_byte_ignored() {
        let mut file = write_samples(&[42, 43]);
        file.write_all(&[0xFF]).unwrap();
        file.flush().unwrap();
        let mut buf = vec![0i16; 4];

        let n = read_tile(file.path(), &tile(2, 2), &mut buf).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..2], &[42, 43]);
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let mut buf = vec![7i16; 4];

        let n = read_tile(file.path(), &tile(2, 2), &mut buf).unwrap();
        assert_eq!(n, 0);
        assert_eq!(buf, vec![7; 4]);
    }

    #[test]
    fn test_missing_file() {
        let mut buf = vec![0i16; 4];
        let result = read_tile("/nonexistent/all10/a10g", &tile(2, 2), &mut buf);

        match result {
            Err(GlobeError::FileIo { path, .. }) => {
                assert!(path.ends_with("a10g"));
            }
            other => panic!("Expected FileIo error, got {:?}", other),
        }
    }
}
