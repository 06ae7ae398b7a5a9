//! Shared command utilities
//!
//! This module contains:
//! - `resolve_config` - Load config and apply command-line overrides
//! - `build_source` - Pick the record source the config points at
//! - `load` - Fetch and validate records, with cache fallback

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use duet_core::{
    load_records, AttributionPolicy, CsvFileSource, DuetConfig, JsonCache, LoadedRecords,
    RecordSource, SheetSource, ValidationContext,
};

/// Global flags that override config values
#[derive(Debug, Default)]
pub struct Overrides {
    pub csv: Option<PathBuf>,
    pub sheet: Option<String>,
    pub cache: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub attribution: Option<String>,
    pub top: Option<usize>,
}

/// Load the config file and apply command-line overrides on top
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<DuetConfig> {
    let mut config = DuetConfig::load(path).context("Failed to load config")?;

    // A source given on the command line replaces whatever the config names
    if let Some(csv) = overrides.csv {
        config.source.csv_path = Some(csv);
        config.source.sheet_url = None;
    }
    if let Some(sheet) = overrides.sheet {
        config.source.sheet_url = Some(sheet);
        config.source.csv_path = None;
    }
    if let Some(cache) = overrides.cache {
        config.source.cache_path = Some(cache);
    }
    if let Some(out) = overrides.out {
        config.output_dir = out;
    }
    if let Some(attribution) = overrides.attribution {
        config.insights.attribution = attribution
            .parse::<AttributionPolicy>()
            .map_err(anyhow::Error::msg)?;
    }
    if let Some(top) = overrides.top {
        config.insights.top_n = top;
    }

    Ok(config)
}

/// The configured record source. A CSV path wins over a sheet link.
pub fn build_source(config: &DuetConfig) -> Result<Box<dyn RecordSource>> {
    if let Some(path) = &config.source.csv_path {
        return Ok(Box::new(CsvFileSource::new(path)));
    }
    if let Some(url) = &config.source.sheet_url {
        let source = SheetSource::new(url).context("Invalid sheet URL")?;
        return Ok(Box::new(source));
    }
    bail!("No expense source configured. Use --csv FILE or --sheet URL, or set [source] in the config")
}

/// Validation context for the configured people; year-less dates get the current year
pub fn validation_context(config: &DuetConfig) -> ValidationContext {
    ValidationContext::new(config.people.clone(), Utc::now().date_naive().year())
}

/// Fetch and validate records from the configured source
pub async fn load(config: &DuetConfig) -> Result<LoadedRecords> {
    let source = build_source(config)?;
    let cache = config.source.cache_path.as_ref().map(JsonCache::new);
    let ctx = validation_context(config);

    let loaded = load_records(source.as_ref(), cache.as_ref(), &ctx)
        .await
        .context("Failed to load expenses")?;

    if loaded.report.records.is_empty() {
        tracing::warn!(
            rows = loaded.report.total_rows(),
            rejected = loaded.report.rejected.len(),
            "No valid expenses found"
        );
    }
    Ok(loaded)
}
