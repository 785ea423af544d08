use anyhow::Result;
use globe::{GridLayout, TileDescriptor};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::format_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum FileStatus {
    Ok,
    Short,
    Missing,
}

#[derive(Serialize)]
struct TileEntry {
    #[serde(flatten)]
    tile: TileDescriptor,
    status: FileStatus,
    /// Actual file size, if the file exists.
    size: Option<u64>,
    expected_size: u64,
    coverage: String,
}

/// Tile coverage as "N90 to N50, W180 to W090".
fn coverage(layout: &GridLayout, tile: &TileDescriptor) -> String {
    let (west, north) = layout.cell_to_lon_lat(tile.row_offset, tile.col_offset);
    let (east, south) = layout.cell_to_lon_lat(
        tile.row_offset + tile.num_rows,
        tile.col_offset + tile.num_cols,
    );

    let lat = |v: f64| {
        let v = v.round();
        format!("{}{:02}", if v >= 0.0 { "N" } else { "S" }, v.abs())
    };
    let lon = |v: f64| {
        let v = v.round();
        format!("{}{:03}", if v >= 0.0 { "E" } else { "W" }, v.abs())
    };

    format!("{} to {}, {} to {}", lat(north), lat(south), lon(west), lon(east))
}

fn entries(layout: &GridLayout, data_dir: &Path) -> Vec<TileEntry> {
    layout
        .tiles
        .iter()
        .map(|tile| {
            let size = fs::metadata(data_dir.join(tile.name)).ok().map(|m| m.len());
            let status = match size {
                None => FileStatus::Missing,
                Some(s) if s < tile.expected_bytes() => FileStatus::Short,
                Some(_) => FileStatus::Ok,
            };
            TileEntry {
                tile: *tile,
                status,
                size,
                expected_size: tile.expected_bytes(),
                coverage: coverage(layout, tile),
            }
        })
        .collect()
}

pub fn run(data_dir: PathBuf, json: bool) -> Result<()> {
    let layout = GridLayout::globe();
    layout.validate()?;
    let entries = entries(&layout, &data_dir);

    if json {
        println!("{}", serde_json::to_string(&entries)?);
        return Ok(());
    }

    println!(
        "{:<12} {:>6} {:>6} {:>7} {:>7} {:>8} {:>28}",
        "TILE", "COLS", "ROWS", "ROW_OFF", "COL_OFF", "STATUS", "COVERAGE"
    );
    println!("{}", "-".repeat(80));

    for entry in &entries {
        let status = match entry.status {
            FileStatus::Ok => "ok",
            FileStatus::Short => "short",
            FileStatus::Missing => "missing",
        };
        println!(
            "{:<12} {:>6} {:>6} {:>7} {:>7} {:>8} {:>28}",
            entry.tile.name,
            entry.tile.num_cols,
            entry.tile.num_rows,
            entry.tile.row_offset,
            entry.tile.col_offset,
            status,
            entry.coverage
        );
    }

    let count = |status: FileStatus| entries.iter().filter(|e| e.status == status).count();
    let short_count = count(FileStatus::Short);
    let missing_count = count(FileStatus::Missing);
    let total_size: u64 = entries.iter().filter_map(|e| e.size).sum();

    // Summary
    println!();
    println!("Summary:");
    println!("  Total tiles: {}", entries.len());
    println!("  Complete: {}", count(FileStatus::Ok));
    if short_count > 0 {
        println!("  Short: {}", short_count);
    }
    if missing_count > 0 {
        println!("  Missing: {}", missing_count);
    }
    println!("  Total size: {}", format_size(total_size));
    println!("  Data directory: {}", data_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_labels() {
        let layout = GridLayout::globe();
        assert_eq!(
            coverage(&layout, &layout.tiles[0]),
            "N90 to N50, W180 to W090"
        );
        assert_eq!(
            coverage(&layout, &layout.tiles[10]),
            "N00 to S50, E000 to E090"
        );
    }

    #[test]
    fn test_entries_status_and_json() {
        let layout = GridLayout::globe();
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("all10")).unwrap();
        fs::write(tmp.path().join("all10/b10g"), [0u8; 4]).unwrap();

        let entries = entries(&layout, tmp.path());
        assert_eq!(entries.len(), 16);
        assert_eq!(entries[0].status, FileStatus::Missing);
        assert_eq!(entries[1].status, FileStatus::Short);
        assert_eq!(entries[1].size, Some(4));

        let json = serde_json::to_value(&entries[1]).unwrap();
        assert_eq!(json["name"], "all10/b10g");
        assert_eq!(json["num_cols"], 10800);
        assert_eq!(json["col_offset"], 10800);
        assert_eq!(json["status"], "short");
        assert_eq!(json["expected_size"], 10800u64 * 4800 * 2);
    }
}
