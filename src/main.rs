mod app;
mod backdrop;
mod canvas;
mod color;
mod config;
mod fireworks;
mod input;
mod overlay;
mod particle;
mod sound;
mod surface;
mod term;
mod world;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::OpenOptions, path::Path, sync::Mutex};

fn main() -> Result<()> {
    let cli = config::Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path, cli.log_level)?;
    }
    app::run(cli)
}

/// The terminal is in raw mode while running, so logs only ever go to a file.
fn init_logging(path: &Path, level: tracing::Level) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
