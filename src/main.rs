mod cli;
mod compose;
mod config;
mod frame;
mod graphics;
mod input;
mod layout;
mod math;
mod shapes;
mod state;
mod terminal;
mod vertex;
mod widget;

use anyhow::{Context, Result};
use cli::Cli;
use config::SessionConfig;
use state::AnimationState;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Fallback output size for still mode when the terminal size is unknown
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Main function
fn main() -> Result<()> {
    let cli = cli::parse();
    initialise_tracing(&cli)?;

    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms;
        config.validate().context("invalid --tick-ms")?;
    }

    let mut initial_state = AnimationState::new(config.motion);
    initial_state.running = cli.running;

    if let Some(ticks) = cli.still {
        let (columns, rows) = termsize::get()
            .map(|size| (size.cols, size.rows))
            .unwrap_or(FALLBACK_SIZE);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        return terminal::render_still(&mut out, &config, initial_state, ticks, columns, rows);
    }

    for line in input::instructions() {
        println!("{line}");
    }
    terminal::run(&config, initial_state)
}

/// Installs the log subscriber. Interactive mode draws on the terminal, so
/// logs go to `--log-file` or nowhere; still mode logs to stderr.
fn initialise_tracing(cli: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.still.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}
