//! Showreel CLI - Headless Player Harness
//!
//! Features:
//! - Source list validation (the `data-sources` attribute format)
//! - Config resolution from data attributes
//! - Scripted playback simulation against a simulated media resource
//! - Time label formatting

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;
mod script;

/// Showreel CLI - Video player widget toolkit
#[derive(Parser)]
#[command(name = "showreel")]
#[command(version)]
#[command(about = "Headless harness for the Showreel video player widget", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an encoded source list
    Sources {
        /// JSON array of {"src", "type"} objects
        encoded: String,

        /// Fail instead of falling back to an empty list
        #[arg(long)]
        strict: bool,
    },

    /// Resolve a player config from data attributes
    Config {
        /// Attribute as name=value, without the data- prefix (repeatable)
        #[arg(short, long = "attr", value_name = "NAME=VALUE")]
        attrs: Vec<String>,
    },

    /// Replay a script of commands and media events
    Simulate {
        /// Player config as a JSON file
        #[arg(short, long)]
        config: PathBuf,

        /// Script as a JSON array of steps
        #[arg(short, long)]
        script: PathBuf,
    },

    /// Format seconds as player time labels
    FormatTime {
        /// Positions in seconds
        #[arg(required = true)]
        seconds: Vec<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    showreel_core::init();

    match cli.command {
        Commands::Sources { encoded, strict } => {
            commands::sources(&encoded, strict, &cli.format)?;
        }
        Commands::Config { attrs } => {
            commands::config(&attrs, &cli.format)?;
        }
        Commands::Simulate { config, script } => {
            commands::simulate(&config, &script, &cli.format)?;
        }
        Commands::FormatTime { seconds } => {
            commands::format_time(&seconds, &cli.format)?;
        }
    }

    Ok(())
}
