pub mod config;
pub mod detect;
pub mod parse;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tally::settings::{load_settings, load_settings_from};
use tally::Settings;

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Infer the layout of a bank statement CSV and extract its transactions."
)]
pub struct Cli {
    /// Settings file (default: ~/.config/tally/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log classifier decisions to stderr (-vv adds per-row detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which column was picked for each role.
    Detect {
        /// Statement CSV file
        file: PathBuf,
        /// Print the mapping as JSON (reusable with `parse --mapping`)
        #[arg(long)]
        json: bool,
    },
    /// Extract transactions from a statement.
    Parse {
        /// Statement CSV file
        file: PathBuf,
        /// JSON mapping file to use instead of inference
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Override one role, e.g. --map credit="Paid In"
        #[arg(long = "map", value_name = "ROLE=COLUMN")]
        map: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Print row counts and totals
        #[arg(long)]
        summary: bool,
    },
    /// Show the effective settings, or write the defaults.
    Config {
        /// Write default settings to the settings file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub(crate) fn resolve_settings(config: Option<&Path>) -> Result<Settings> {
    Ok(match config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    })
}
