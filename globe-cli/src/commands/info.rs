use anyhow::{Context, Result};
use globe::{store::read_raster, GridLayout, SampleStats};
use serde::Serialize;
use std::path::PathBuf;

use super::format_size;

#[derive(Serialize)]
struct RasterInfo {
    path: PathBuf,
    cols: usize,
    rows: usize,
    file_size: u64,
    mean: Option<f64>,
    stats: SampleStats,
}

pub fn run(input: PathBuf, json: bool) -> Result<()> {
    let layout = GridLayout::globe();

    let metadata = std::fs::metadata(&input)
        .with_context(|| format!("Raster not found: {}", input.display()))?;

    let spinner = super::spinner("reading raster");
    let raster = read_raster(&input, &layout)
        .with_context(|| format!("Failed to read raster {}", input.display()))?;
    spinner.set_message("computing statistics");
    let stats = raster.stats();
    spinner.finish_and_clear();

    if json {
        let info = RasterInfo {
            path: input,
            cols: raster.cols(),
            rows: raster.rows(),
            file_size: metadata.len(),
            mean: stats.mean(),
            stats,
        };
        println!("{}", serde_json::to_string(&info)?);
        return Ok(());
    }

    println!("Raster: {}", input.display());
    println!();
    println!(
        "Grid: {}x{} cells ({:.6}° per cell)",
        raster.cols(),
        raster.rows(),
        layout.cell_size()
    );
    println!("File size: {}", format_size(metadata.len()));
    println!();

    if let Some((min, max)) = stats.range() {
        println!("Min elevation: {}m", min);
        println!("Max elevation: {}m", max);
    }
    if let Some(mean) = stats.mean() {
        println!("Mean elevation: {:.2}m", mean);
    }

    let no_data = stats.no_data();
    if no_data > 0 {
        let pct = (no_data as f64 / stats.total as f64) * 100.0;
        println!("No-data cells: {} ({:.1}%)", no_data, pct);
    }

    Ok(())
}
