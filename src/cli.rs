use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Seasonal quantile-mapping bias correction of gridded climate data.
#[derive(Parser)]
#[command(
    name = "qmbc",
    version,
    about = "Seasonal quantile-mapping bias correction with trend preservation"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Bias-correct historical and future model runs against observations.
    Correct(CorrectArgs),
    /// Print the season catalog a region or latitude range resolves to.
    Seasons(SeasonsArgs),
}

/// Arguments for the `correct` subcommand.
#[derive(clap::Args)]
pub struct CorrectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "qmbc.toml")]
    pub config: PathBuf,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the region name from config.
    #[arg(short, long)]
    pub region: Option<String>,

    /// Write the JSON correction report here (overrides config).
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the `seasons` subcommand.
#[derive(clap::Args)]
pub struct SeasonsArgs {
    /// Region name (India, Australia, US).
    #[arg(short, long)]
    pub region: Option<String>,

    /// Latitude range of the area.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    pub lat_range: Option<Vec<f64>>,
}
