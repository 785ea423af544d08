use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use globe::{BoundingBox, Palette};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// GLOBE elevation raster tool
#[derive(Parser, Debug)]
#[command(name = "globe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory the tile paths (all10/a10g ...) are resolved against
    #[arg(
        short,
        long,
        env = "GLOBE_DATA_DIR",
        default_value = ".",
        global = true
    )]
    data_dir: PathBuf,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge the sixteen GLOBE tiles into one global raster file
    Merge {
        /// Output raster file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a global raster file as a PNG image
    Render {
        /// Input raster file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value = "800")]
        width: usize,

        /// Image height in pixels
        #[arg(long, default_value = "800")]
        height: usize,

        /// Color palette: terrain or greyscale
        #[arg(short, long, default_value = "terrain")]
        palette: Palette,

        /// Scale the whole region to the image instead of cropping its top-left corner
        #[arg(short, long)]
        resample: bool,

        #[command(flatten)]
        bounds: BoundsArgs,
    },

    /// Export a global raster file as a lon,lat,elev CSV table
    Table {
        /// Input raster file
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Append to the output instead of replacing it
        #[arg(short, long)]
        append: bool,

        #[command(flatten)]
        bounds: BoundsArgs,
    },

    /// Display dimensions and statistics of a global raster file
    Info {
        /// Input raster file
        #[arg(short, long)]
        input: PathBuf,

        /// Output statistics as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the GLOBE tiles and check their files in the data directory
    Tiles {
        /// Output the tile table as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Optional geographic bounds; all four or none.
#[derive(Args, Debug, Default)]
struct BoundsArgs {
    /// Western boundary longitude
    #[arg(long, allow_negative_numbers = true)]
    minlon: Option<f64>,

    /// Southern boundary latitude
    #[arg(long, allow_negative_numbers = true)]
    minlat: Option<f64>,

    /// Eastern boundary longitude
    #[arg(long, allow_negative_numbers = true)]
    maxlon: Option<f64>,

    /// Northern boundary latitude
    #[arg(long, allow_negative_numbers = true)]
    maxlat: Option<f64>,
}

impl BoundsArgs {
    fn bbox(&self) -> Result<Option<BoundingBox>> {
        match (self.minlon, self.minlat, self.maxlon, self.maxlat) {
            (None, None, None, None) => Ok(None),
            (Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)) => {
                Ok(Some(BoundingBox::new(min_lon, min_lat, max_lon, max_lat)))
            }
            _ => bail!("--minlon, --minlat, --maxlon and --maxlat must be given together"),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "globe=debug,globe_cli=debug"
    } else {
        "globe=info,globe_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    // Usage errors exit with 1; help and version output exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Merge { output } => commands::merge::run(cli.data_dir, output),
        Commands::Render {
            input,
            output,
            width,
            height,
            palette,
            resample,
            bounds,
        } => commands::render::run(
            input,
            output,
            width,
            height,
            palette,
            resample,
            bounds.bbox()?,
        ),
        Commands::Table {
            input,
            output,
            append,
            bounds,
        } => commands::table::run(input, output, append, bounds.bbox()?),
        Commands::Info { input, json } => commands::info::run(input, json),
        Commands::Tiles { json } => commands::tiles::run(cli.data_dir, json),
    }
}
