use anyhow::{Context, Result};
use globe::{
    render::{render, write_png},
    store::read_raster,
    BoundingBox, GridLayout, Palette, RenderOptions, Sampling,
};
use std::path::PathBuf;
use tracing::debug;

pub fn run(
    input: PathBuf,
    output: PathBuf,
    width: usize,
    height: usize,
    palette: Palette,
    resample: bool,
    bbox: Option<BoundingBox>,
) -> Result<()> {
    let layout = GridLayout::globe();

    let mut options = RenderOptions::new(width, height).palette(palette);
    if resample {
        options = options.sampling(Sampling::Resample);
    }
    if let Some(bbox) = bbox {
        options = options.region(layout.region(&bbox).context("Invalid bounds")?);
    }

    debug!(?options, input = %input.display(), "render options");

    let spinner = super::spinner("reading raster");
    let raster = read_raster(&input, &layout)
        .with_context(|| format!("Failed to read raster {}", input.display()))?;

    spinner.set_message("rendering");
    let pixels = render(&raster, &options).context("Failed to render raster")?;

    spinner.set_message("writing png");
    write_png(&pixels, &output)
        .with_context(|| format!("Failed to write image to {}", output.display()))?;
    spinner.finish_and_clear();

    println!("Output written to: {}", output.display());
    Ok(())
}
