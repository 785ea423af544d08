//! Cut a merged raster into a zoom-level grid of equirectangular PNG tiles.
//!
//! Run with: cargo run --example map_tiles -- ./globe.bin ./tiles 2

use globe::{render, store, BoundingBox, GlobeError, GridLayout, RenderOptions, Sampling};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), GlobeError> {
    let mut args = env::args().skip(1);
    let (input, out_dir) = match (args.next(), args.next()) {
        (Some(input), Some(out_dir)) => (input, PathBuf::from(out_dir)),
        _ => {
            eprintln!("Usage: cargo run --example map_tiles -- <globe.bin> <out-dir> [zoom]");
            std::process::exit(1);
        }
    };
    let zoom: u32 = args.next().and_then(|z| z.parse().ok()).unwrap_or(2);

    let layout = GridLayout::globe();
    let raster = store::read_raster(&input, &layout)?;

    // 2^z columns and rows of tiles, each 360/2^z by 180/2^z degrees.
    let n = 2u32.pow(zoom);
    let lon_size = 360.0 / n as f64;
    let lat_size = 180.0 / n as f64;

    for y in 0..n {
        for x in 0..n {
            let min_lon = x as f64 * lon_size - 180.0;
            let max_lat = 90.0 - y as f64 * lat_size;
            let bbox = BoundingBox::new(min_lon, max_lat - lat_size, min_lon + lon_size, max_lat);

            let options = RenderOptions::new(256, 256)
                .sampling(Sampling::Resample)
                .region(layout.region(&bbox)?);
            let pixels = render::render(&raster, &options)?;

            let dir = out_dir.join(zoom.to_string()).join(x.to_string());
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(format!("{}.png", y));
            render::write_png(&pixels, &path)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
