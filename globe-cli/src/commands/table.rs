use anyhow::{Context, Result};
use globe::{
    store::read_raster,
    table::{open_table, TableMode},
    BoundingBox, GridLayout,
};
use std::path::PathBuf;
use tracing::debug;

pub fn run(input: PathBuf, output: PathBuf, append: bool, bbox: Option<BoundingBox>) -> Result<()> {
    let layout = GridLayout::globe();
    let region = bbox
        .map(|b| layout.region(&b))
        .transpose()
        .context("Invalid bounds")?;
    let mode = if append {
        TableMode::Append
    } else {
        TableMode::Truncate
    };

    debug!(?region, ?mode, input = %input.display(), "table options");

    let spinner = super::spinner("reading raster");
    let raster = read_raster(&input, &layout)
        .with_context(|| format!("Failed to read raster {}", input.display()))?;

    spinner.set_message("exporting table");
    let rows = open_table(&output, mode)
        .and_then(|table| table.export(&raster, region))
        .with_context(|| format!("Failed to write table to {}", output.display()))?;
    spinner.finish_and_clear();

    println!("Wrote {} rows to: {}", rows, output.display());
    Ok(())
}
