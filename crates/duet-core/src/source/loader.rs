//! Fetch, validate and cache in one step

use std::fmt;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::validate::{ingest, IngestReport, ValidationContext};

use super::{JsonCache, RecordSource};

/// Where a batch of records ended up coming from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Fresh rows from the named source
    Source(String),
    /// The source failed; rows came from the cache
    Cache,
}

impl fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(name) => write!(f, "{}", name),
            Self::Cache => write!(f, "cache"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub origin: LoadOrigin,
    pub report: IngestReport,
}

/// Load records from `source`, falling back to `cache` if the fetch fails.
///
/// A successful fetch with at least one valid row refreshes the cache. A
/// failed cache write is logged and does not fail the load.
pub async fn load_records(
    source: &dyn RecordSource,
    cache: Option<&JsonCache>,
    ctx: &ValidationContext,
) -> Result<LoadedRecords> {
    match source.fetch().await {
        Ok(rows) => {
            let report = ingest(&rows, ctx);
            info!(
                source = source.name(),
                accepted = report.records.len(),
                rejected = report.rejected.len(),
                "Loaded expenses"
            );

            if let Some(cache) = cache {
                if report.records.is_empty() {
                    warn!("No valid records, leaving cache untouched");
                } else if let Err(e) = cache.save(&report.records, &ctx.people) {
                    warn!(path = %cache.path().display(), error = %e, "Failed to refresh cache");
                }
            }

            Ok(LoadedRecords {
                origin: LoadOrigin::Source(source.name().to_string()),
                report,
            })
        }
        Err(source_err) => {
            warn!(source = source.name(), error = %source_err, "Source failed, trying cache");

            let cache = cache.ok_or_else(|| {
                Error::NotFound(format!(
                    "{} failed ({}) and no cache is configured",
                    source.name(),
                    source_err
                ))
            })?;
            let cached = cache.load().map_err(|e| match e {
                Error::NotFound(msg) => Error::NotFound(format!(
                    "{} failed ({}); {}",
                    source.name(),
                    source_err,
                    msg
                )),
                other => other,
            })?;

            // Cached rows carry the names they were written with
            let cache_ctx = ValidationContext::new(cached.people(), ctx.default_year);
            let report = ingest(&cached.expenses, &cache_ctx);
            info!(
                path = %cache.path().display(),
                accepted = report.records.len(),
                "Loaded expenses from cache"
            );

            Ok(LoadedRecords {
                origin: LoadOrigin::Cache,
                report,
            })
        }
    }
}
