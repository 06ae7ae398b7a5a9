//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Duet - Shared expense insights for two
#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Shared expense insights and monthly reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the local data dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Read expenses from this CSV file
    #[arg(long, global = true, conflicts_with = "sheet")]
    pub csv: Option<PathBuf>,

    /// Read expenses from this Google Sheet link
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// JSON cache used when the source can't be reached
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Output directory for rendered reports
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Shared expense attribution: shared_bucket, split_evenly
    #[arg(long, global = true)]
    pub attribution: Option<String>,

    /// Number of top expenses to list
    #[arg(long, global = true)]
    pub top: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show insights over all expenses
    Insights {
        /// Start date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<String>,
    },

    /// Build monthly reports and write them to the output directory
    Report {
        /// Month to report on (YYYY-MM)
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        month: Option<String>,

        /// Report on every month in the data
        #[arg(long)]
        all: bool,

        /// Output formats: json, csv (repeatable)
        #[arg(long = "format", default_value = "json")]
        formats: Vec<String>,
    },

    /// Check every row and list the ones that fail validation
    Validate,
}
