use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doraemon2d",
    version,
    about = "A console-based 2D cartoon animation demo"
)]
pub struct Cli {
    /// Session configuration file (TOML); built-in defaults are used when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the timer period in milliseconds
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Start with the animation running instead of paused
    #[arg(long)]
    pub running: bool,

    /// Advance the given number of ticks, print one frame to stdout and exit
    #[arg(long, value_name = "TICKS")]
    pub still: Option<u32>,

    /// Write logs to this file (interactive mode owns the terminal otherwise)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

pub fn parse() -> Cli {
    Cli::parse()
}
