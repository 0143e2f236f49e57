use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "shokuhi")]
#[command(
    author,
    version,
    about = "Compare household food expenditure across Japanese prefectures"
)]
#[command(after_help = "Examples:
  shokuhi inspect kakei.csv
  shokuhi render kakei.csv --category 米 --region 東京都 --region 大阪府
  shokuhi render kakei.csv --x パン --y めん類 --output out/
  shokuhi render kakei.csv --boundary-file japan.geojson

Boundaries:
  By default the prefecture GeoJSON is downloaded once per run from the URL in
  ~/.config/shokuhi/dashboard.toml (or the built-in default).")]
pub struct Config {
    /// Path to dashboard.toml configuration file
    #[arg(long, global = true, env = "SHOKUHI_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the boundary GeoJSON URL from the configuration file
    #[arg(long, global = true, env = "BOUNDARY_URL", value_name = "URL")]
    pub boundary_url: Option<String>,

    /// Read boundaries from a local GeoJSON file instead of the network
    #[arg(long, global = true, env = "BOUNDARY_FILE", value_name = "PATH")]
    pub boundary_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the detected encoding, region column, categories and a preview
    #[command(after_help = "Example: shokuhi inspect kakei.csv")]
    Inspect {
        /// CSV file to read
        #[arg(value_name = "CSV")]
        csv: PathBuf,
    },
    /// Render the bar chart, map and scatter plot as SVG files
    #[command(after_help = "Examples:
  shokuhi render kakei.csv                          # Default category and regions
  shokuhi render kakei.csv --category パン           # Compare a specific category
  shokuhi render kakei.csv -r 北海道 -r 福岡県        # Choose the regions to compare
  shokuhi render kakei.csv --x 米 --y パン -o charts/ # Scatter axes and output directory")]
    Render {
        /// CSV file to read
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        /// Category (expenditure column) to compare
        #[arg(short, long)]
        category: Option<String>,

        /// Region to compare; repeat for several. Defaults come from the configuration
        #[arg(short, long = "region", value_name = "REGION")]
        regions: Vec<String>,

        /// Scatter plot x-axis category
        #[arg(long)]
        x: Option<String>,

        /// Scatter plot y-axis category
        #[arg(long)]
        y: Option<String>,

        /// Directory the SVG files are written to
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },
}
