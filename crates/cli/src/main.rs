//! interscribe command line.
//!
//! Inspects the rotation pool and drives single requests through the cache
//! without an MCP client. Logs go to stderr, results to stdout.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use interscribe_core::InterscribeConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "interscribe")]
#[command(about = "Rotate external document references into cached HTML pages")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", env = "INTERSCRIBE_CONFIG_FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the documents eligible for rotation
    Pool {
        /// Print the full references as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the fragment for one pool entry without advancing the cursor
    Preview {
        /// Pool index
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },

    /// Resolve one resource path and persist the cursor afterwards
    Resolve {
        /// Resource path, e.g. /path/to/page.blue
        path: String,
    },

    /// Show pool counts and the rotation cursor
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(config_file = ?cli.config, "loading configuration");
    let config = InterscribeConfig::load_from(cli.config.as_deref())?;

    let output = match cli.command {
        Command::Pool { json } => commands::pool(&config, json)?,
        Command::Preview { index } => commands::preview(config, index)?,
        Command::Resolve { path } => commands::resolve(config, &path)?,
        Command::Status => commands::status(config)?,
    };
    println!("{output}");

    Ok(())
}
