//! Configuration
//!
//! Loaded from TOML. Resolution order:
//! 1. An explicit path (the CLI's `--config`)
//! 2. `<local data dir>/duet/config/duet.toml`
//! 3. The defaults compiled into the binary
//!
//! ```toml
//! [people]
//! person_a = "Alice"
//! person_b = "Bob"
//!
//! [insights]
//! attribution = "split_evenly"
//! top_n = 10
//!
//! [source]
//! sheet_url = "https://docs.google.com/spreadsheets/d/<id>/edit"
//! cache_path = "expenses_cache.json"
//!
//! [output]
//! dir = "reports"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::insights::{AttributionPolicy, InsightOptions};
use crate::models::People;

/// Embedded default config
const DEFAULT_CONFIG: &str = include_str!("../../../config/duet.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct DuetConfig {
    pub people: People,
    pub insights: InsightOptions,
    pub source: SourceConfig,
    pub output_dir: PathBuf,
}

/// Where records come from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceConfig {
    pub csv_path: Option<PathBuf>,
    pub sheet_url: Option<String>,
    pub cache_path: Option<PathBuf>,
}

impl Default for DuetConfig {
    fn default() -> Self {
        Self {
            people: People::default(),
            insights: InsightOptions::default(),
            source: SourceConfig::default(),
            output_dir: PathBuf::from("out"),
        }
    }
}

impl DuetConfig {
    /// Load config following the resolution order above
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_config(path)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("duet").join("config").join("duet.toml"))
}

/// Load configuration (explicit path, then override location, then default).
///
/// An explicit path that doesn't exist is an error; a missing override file
/// is not.
pub fn load_config(path: Option<&Path>) -> Result<DuetConfig> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(default_path) => {
                debug!(path = %default_path.display(), "Using config override");
                fs::read_to_string(&default_path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            None => DEFAULT_CONFIG.to_string(),
        },
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    people: Option<RawPeople>,
    insights: Option<RawInsights>,
    source: Option<RawSource>,
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawPeople {
    person_a: Option<String>,
    person_b: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    attribution: Option<String>,
    top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    csv_path: Option<PathBuf>,
    sheet_url: Option<String>,
    cache_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    dir: Option<PathBuf>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<DuetConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = DuetConfig::default();

    if let Some(people) = raw.people {
        if let Some(name) = non_empty(people.person_a) {
            config.people.person_a = name;
        }
        if let Some(name) = non_empty(people.person_b) {
            config.people.person_b = name;
        }
        if config.people.person_a.eq_ignore_ascii_case(&config.people.person_b) {
            return Err(Error::Config(format!(
                "person_a and person_b must differ (both '{}')",
                config.people.person_a
            )));
        }
    }

    if let Some(insights) = raw.insights {
        if let Some(attribution) = insights.attribution {
            config.insights.attribution = attribution
                .parse::<AttributionPolicy>()
                .map_err(Error::Config)?;
        }
        if let Some(top_n) = insights.top_n {
            config.insights.top_n = top_n;
        }
    }

    if let Some(source) = raw.source {
        config.source = SourceConfig {
            csv_path: source.csv_path,
            sheet_url: non_empty(source.sheet_url),
            cache_path: source.cache_path,
        };
    }

    if let Some(dir) = raw.output.and_then(|o| o.dir) {
        config.output_dir = dir;
    }

    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
