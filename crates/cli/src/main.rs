//! Demand Predictor CLI
//!
//! A command-line tool for running demand predictions against a serialized
//! model artifact: one-shot queries, interactive prompting, and artifact
//! inspection.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, predict};
use std::path::PathBuf;

/// Demand Predictor CLI
#[derive(Parser)]
#[command(name = "demand")]
#[command(author, version, about = "CLI for the Demand Predictor", long_about = None)]
pub struct Cli {
    /// Path to the model artifact (can also be set via DEMAND_MODEL env var)
    #[arg(long, env = "DEMAND_MODEL", default_value = "model_dump.json")]
    pub model: PathBuf,

    /// Number of wrap layers around the artifact envelope
    #[arg(long, default_value_t = predictor_lib::DEFAULT_WRAP_DEPTH)]
    pub wrap_depth: usize,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict demand for one query record
    Predict {
        /// Year of the queried date
        year: i64,

        /// Month of the queried date (1-12)
        month: i64,

        /// Day of the queried date (1-31)
        day: i64,

        /// Store identifier
        store_id: i64,

        /// Item identifier
        item_id: i64,
    },

    /// Prompt for query fields interactively
    Interactive,

    /// Show metadata about the model artifact
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Predict {
            year,
            month,
            day,
            store_id,
            item_id,
        }) => {
            predict::run_one(
                &cli.model,
                cli.wrap_depth,
                [year, month, day, store_id, item_id],
                cli.format,
            )?;
        }
        Some(Commands::Interactive) => {
            predict::run_interactive(&cli.model, cli.wrap_depth, cli.format)?;
        }
        Some(Commands::Inspect) => {
            inspect::run(&cli.model, cli.wrap_depth, cli.format)?;
        }
        // Bare invocation: evaluate the fixed default query
        None => {
            predict::run_default(&cli.model, cli.wrap_depth, cli.format)?;
        }
    }

    Ok(())
}
