use std::path::PathBuf;

use anyhow::Result;
use solarsuit::{Category, Config, Layer, ALL_DISTRICTS, NATIONAL_AVERAGE};

/// Solar suitability rollups and classification
#[derive(clap::Parser, Debug)]
#[command(name = "solarsuit", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML config file
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// District shapefile, overriding both configured paths
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(data) = &self.data {
            config.primary_path = data.clone();
            config.fallback_path = data.clone();
        }
        Ok(config)
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the summary, distribution and map classification for a selection as JSON
    View(ViewArgs),

    /// List the selectable states, and the districts of one state
    Options(OptionsArgs),

    /// Write the aggregated dataset to a .csv or .parquet file
    Export(ExportArgs),

    /// Write a simplified, numerically-typed copy of a shapefile
    Optimize(OptimizeArgs),

    /// Classify a single value on a category's scale
    Classify(ClassifyArgs),
}

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// State name, or "National Average"
    #[arg(short, long, default_value = NATIONAL_AVERAGE)]
    pub state: String,

    /// District name, or "All Districts"
    #[arg(short, long, default_value = ALL_DISTRICTS)]
    pub district: String,

    /// Suitability category, by label or column name
    #[arg(short, long, default_value = "Adaptation")]
    pub category: Category,

    /// Indicator layer, by label or column name
    #[arg(short, long, default_value = "GW_dev_sta")]
    pub layer: Layer,
}

#[derive(clap::Args, Debug)]
pub struct OptionsArgs {
    /// State whose districts to list
    #[arg(short, long, default_value = NATIONAL_AVERAGE)]
    pub state: String,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output file; the extension picks the format
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct OptimizeArgs {
    /// Source shapefile, defaults to the configured fallback path
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Destination shapefile, defaults to the configured primary path
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Simplification tolerance, defaults to the configured value
    #[arg(short, long)]
    pub tolerance: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Indicator value
    #[arg(allow_negative_numbers = true)]
    pub value: f64,

    /// Category whose scale to apply
    #[arg(short, long, default_value = "Adaptation")]
    pub category: Category,
}
