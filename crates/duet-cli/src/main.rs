//! Duet CLI - Shared expense insights for two
//!
//! Usage:
//!   duet insights                    Totals, trends and patterns
//!   duet report --month 2024-03      Write one monthly report
//!   duet report --all                Write a report for every month
//!   duet validate                    List rows that fail validation

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let overrides = commands::Overrides {
        csv: cli.csv,
        sheet: cli.sheet,
        cache: cli.cache,
        out: cli.out,
        attribution: cli.attribution,
        top: cli.top,
    };
    let config = commands::resolve_config(cli.config.as_deref(), overrides)?;

    match cli.command {
        Commands::Insights { from, to } => {
            commands::cmd_insights(&config, from.as_deref(), to.as_deref()).await
        }
        Commands::Report {
            month,
            all,
            formats,
        } => commands::cmd_report(&config, month.as_deref(), all, &formats).await,
        Commands::Validate => commands::cmd_validate(&config).await,
    }
}
