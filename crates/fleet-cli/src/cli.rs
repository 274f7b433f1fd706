use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fleet",
    about = "Fleet rental inventory: vehicle lots and rental shops",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Root of the shared data directory
    #[arg(long, global = true, env = "FLEET_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add vehicles to, or remove a vehicle from, a lot
    Lot(LotArgs),
    /// Run a rental shop
    Shop(ShopArgs),
}

#[derive(Args)]
pub struct LotArgs {
    #[arg(long)]
    pub lot_name: String,
    #[arg(long, default_value_t = 0)]
    pub add_sedan: usize,
    #[arg(long, default_value_t = 0)]
    pub add_suv: usize,
    #[arg(long, default_value_t = 0)]
    pub add_van: usize,
    #[arg(long)]
    pub remove_vehicle: Option<String>,
}

#[derive(Args)]
pub struct ShopArgs {
    #[arg(long)]
    pub location: String,
    /// Parking capacity of a new shop
    #[arg(long)]
    pub spaces_available: Option<u32>,
    /// Comma-separated lots, in the order they are asked for vehicles
    #[arg(long, value_delimiter = ',')]
    pub lots: Vec<String>,
    /// Stock a new shop with one vehicle from its lots
    #[arg(long)]
    pub seed_from_lots: bool,
    #[arg(long)]
    pub relocation_threshold: Option<u32>,
}
