// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "soft-surface")]
#[command(about = "Present software-rendered frames onto a window", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Present into an in-memory window instead of a native one
    #[arg(long = "headless", default_value = "false")]
    pub headless: bool,

    /// Override the number of frames presented in headless mode
    #[arg(long)]
    pub frames: Option<u64>,

    /// Write the headless run report as JSON to this file instead of stdout
    #[arg(long = "stats-json")]
    pub stats_json: Option<PathBuf>,
}
