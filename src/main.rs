//! threepen - a live-preview playground for three.js sketches.

#![allow(dead_code)]

mod actor;
mod cli;
mod compose;
mod config;
mod core;
mod deps;
mod embed;
mod logger;
mod relay;
mod reload;
mod sandbox;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PlaygroundConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(PlaygroundConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(&config),
        Commands::Compose { output, .. } => cli::compose::compose_sketch(&config, output.as_deref()),
        Commands::Versions { limit } => cli::versions::list_versions(&config, *limit),
    }
}
