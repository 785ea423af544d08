use anyhow::{Context, Result};
use globe::{merge::merge_tiles, store::write_raster, GridLayout};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

pub fn run(data_dir: PathBuf, output: PathBuf) -> Result<()> {
    let layout = GridLayout::globe();

    let pb = ProgressBar::new(layout.tiles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = merge_tiles(&layout, &data_dir, |tile| {
        pb.set_message(tile.tile.name);
        pb.inc(1);
    })
    .with_context(|| format!("Failed to merge tiles from {}", data_dir.display()))?;
    pb.finish_with_message("merged");

    println!("{:<12} {:>10} {:>10} {:>8} {:>8}", "TILE", "SAMPLES", "MEAN", "MIN", "MAX");
    println!("{}", "-".repeat(52));
    for tile in &report.tiles {
        let (min, max) = tile.stats.range().unwrap_or((0, 0));
        println!(
            "{:<12} {:>10} {:>10.2} {:>8} {:>8}",
            tile.tile.name,
            tile.samples,
            tile.stats.mean().unwrap_or(0.0),
            min,
            max
        );
    }
    println!();
    println!("Globe: {}", report.stats);

    let spinner = super::spinner("writing raster");
    write_raster(&output, &report.raster)
        .with_context(|| format!("Failed to write raster to {}", output.display()))?;
    spinner.finish_and_clear();

    println!("Output written to: {}", output.display());
    Ok(())
}
