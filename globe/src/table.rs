//! Exporting the global raster as a `lon,lat,elev` CSV table.
//!
//! Cells holding [`NO_DATA`] or exactly zero are skipped; everything else
//! becomes one row with the cell's longitude and latitude in decimal degrees.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{GlobeError, Result};
use crate::layout::{cell_coords, CellRegion, NO_DATA};
use crate::raster::GlobalRaster;
use crate::store::temp_file_beside;

/// Column names of the table.
pub const HEADER: [&str; 3] = ["lon", "lat", "elev"];

/// What to do with an existing output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableMode {
    /// Replace the file.
    #[default]
    Truncate,
    /// Add rows after the existing content.
    Append,
}

/// An open table output.
pub struct TableFile {
    target: TableTarget,
    /// Whether the header still has to be written.
    needs_header: bool,
}

enum TableTarget {
    /// A new file replacing `path` once the export succeeds.
    Replace { tmp: NamedTempFile, path: PathBuf },
    /// An existing file written in place.
    Append(File),
}

/// Open `path` for [`export_table`].
///
/// In [`TableMode::Truncate`] the rows go to a temporary file beside `path`
/// that only replaces it after a successful export. In [`TableMode::Append`]
/// the header is only written to a file that is empty once opened, so an
/// appended file keeps a single header line.
pub fn open_table<P: AsRef<Path>>(path: P, mode: TableMode) -> Result<TableFile> {
    let path = path.as_ref();
    match mode {
        TableMode::Truncate => Ok(TableFile {
            target: TableTarget::Replace {
                tmp: temp_file_beside(path)?,
                path: path.to_path_buf(),
            },
            needs_header: true,
        }),
        TableMode::Append => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| GlobeError::file(path, e))?;
            let len = file.metadata().map_err(|e| GlobeError::file(path, e))?.len();
            Ok(TableFile {
                target: TableTarget::Append(file),
                needs_header: len == 0,
            })
        }
    }
}

impl TableFile {
    /// Write the rows of `region` to the file. Returns the number of rows.
    pub fn export(self, raster: &GlobalRaster, region: Option<CellRegion>) -> Result<u64> {
        match self.target {
            TableTarget::Replace { tmp, path } => {
                let rows = write_file(tmp.as_file(), raster, region, self.needs_header)
                    .map_err(|e| match e {
                        GlobeError::Io(e) => GlobeError::file(tmp.path(), e),
                        other => other,
                    })?;
                tmp.persist(&path)
                    .map_err(|e| GlobeError::file(&path, e.error))?;
                Ok(rows)
            }
            TableTarget::Append(file) => write_file(&file, raster, region, self.needs_header),
        }
    }
}

fn write_file(
    file: &File,
    raster: &GlobalRaster,
    region: Option<CellRegion>,
    header: bool,
) -> Result<u64> {
    let (rows, writer) = write_rows(raster, region, BufWriter::new(file), header)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(rows)
}

/// Write a header followed by the rows of `region` to `writer`.
///
/// Returns the number of data rows written.
pub fn export_table<W: Write>(
    raster: &GlobalRaster,
    region: Option<CellRegion>,
    writer: W,
) -> Result<u64> {
    write_rows(raster, region, writer, true).map(|(rows, _)| rows)
}

fn write_rows<W: Write>(
    raster: &GlobalRaster,
    region: Option<CellRegion>,
    writer: W,
    header: bool,
) -> Result<(u64, W)> {
    let region = region.unwrap_or_else(|| raster.full_region());
    if !raster.contains(&region) {
        return Err(GlobeError::InvalidDimensions {
            width: region.cols,
            height: region.rows,
            cols: raster.cols(),
            rows: raster.rows(),
        });
    }

    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    if header {
        csv.write_record(HEADER)?;
    }

    let mut rows = 0u64;
    for y in 0..region.rows {
        let row = region.top + y;
        for (x, &value) in raster.region_row(&region, y).iter().enumerate() {
            if value == NO_DATA || value == 0 {
                continue;
            }
            let (lon, lat) = cell_coords(raster.cols(), row, region.left + x);
            csv.write_record(&[
                format!("{:.6}", lon),
                format!("{:.6}", lat),
                value.to_string(),
            ])?;
            rows += 1;
        }
    }

    csv.flush()?;
    debug!(rows, "exported table");
    let writer = csv.into_inner().map_err(|e| e.into_error())?;
    Ok((rows, writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn export_to_string(raster: &GlobalRaster, region: Option<CellRegion>) -> (u64, String) {
        let mut out = Vec::new();
        let rows = export_table(raster, region, &mut out).unwrap();
        (rows, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_cell_at_origin() {
        let layout = crate::layout::GridLayout::scaled(1200).unwrap();
        let mut data = vec![0i16; layout.cells()];
        data[0] = 1234;
        let raster = GlobalRaster::from_samples(layout.cols, layout.rows, data).unwrap();

        let (rows, text) = export_to_string(&raster, None);
        assert_eq!(rows, 1);
        assert_eq!(text, "lon,lat,elev\n-180.000000,90.000000,1234\n");
    }

    #[test]
    fn test_skips_no_data_and_zero() {
        let raster = GlobalRaster::from_samples(4, 2, vec![0, NO_DATA, -3, 0, 7, 0, NO_DATA, 0])
            .unwrap();

        let (rows, text) = export_to_string(&raster, None);
        assert_eq!(rows, 2);
        let lines: Vec<&str> = text.lines().collect();
        // 4 columns span 90° each; 2 rows span 90° each.
        assert_eq!(
            lines,
            vec![
                "lon,lat,elev",
                "0.000000,90.000000,-3",
                "-180.000000,0.000000,7"
            ]
        );
    }

    #[test]
    fn test_region_keeps_global_coordinates() {
        let raster = GlobalRaster::from_samples(4, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let region = CellRegion {
            top: 1,
            left: 3,
            rows: 1,
            cols: 1,
        };

        let (rows, text) = export_to_string(&raster, Some(region));
        assert_eq!(rows, 1);
        assert_eq!(text, "lon,lat,elev\n90.000000,0.000000,8\n");
    }

    #[test]
    fn test_region_outside_raster_fails() {
        let raster = GlobalRaster::from_samples(2, 2, vec![1; 4]).unwrap();
        let region = CellRegion {
            top: 1,
            left: 1,
            rows: 2,
            cols: 1,
        };
        assert!(export_table(&raster, Some(region), Vec::new()).is_err());
    }

    #[test]
    fn test_truncate_mode_replaces_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("globe.csv");
        std::fs::write(&path, "old content\n").unwrap();
        let raster = GlobalRaster::from_samples(2, 1, vec![10, 0]).unwrap();

        let rows = open_table(&path, TableMode::Truncate)
            .unwrap()
            .export(&raster, None)
            .unwrap();

        assert_eq!(rows, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "lon,lat,elev\n-180.000000,90.000000,10\n"
        );
    }

    #[test]
    fn test_failed_truncate_keeps_old_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("globe.csv");
        std::fs::write(&path, "lon,lat,elev\n1.000000,2.000000,3\n").unwrap();
        let raster = GlobalRaster::from_samples(2, 1, vec![10, 0]).unwrap();
        let outside = CellRegion {
            top: 0,
            left: 1,
            rows: 1,
            cols: 2,
        };

        let result = open_table(&path, TableMode::Truncate)
            .unwrap()
            .export(&raster, Some(outside));

        assert!(matches!(result, Err(GlobeError::InvalidDimensions { .. })));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "lon,lat,elev\n1.000000,2.000000,3\n"
        );
        // The temporary file is removed when the export fails.
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_append_mode_writes_header_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("globe.csv");
        let raster = GlobalRaster::from_samples(2, 1, vec![10, 0]).unwrap();

        for _ in 0..2 {
            open_table(&path, TableMode::Append)
                .unwrap()
                .export(&raster, None)
                .unwrap();
        }

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "lon,lat,elev\n-180.000000,90.000000,10\n-180.000000,90.000000,10\n"
        );
    }
}
