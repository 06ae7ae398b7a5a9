//! Duet Core Library
//!
//! Shared-expense insights for two people and a joint pot:
//! - Record validation from raw sheet rows
//! - Record sources (CSV file, Google Sheet) with a JSON cache fallback
//! - Insights engine: totals, trends, top expenses, budget statistics
//! - Monthly report assembly with chart specs
//! - Renderers that write report models to disk
//! - TOML configuration

pub mod config;
pub mod error;
pub mod insights;
pub mod models;
pub mod render;
pub mod report;
pub mod source;
pub mod validate;

/// Test utilities: record builders and sample data
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{DuetConfig, SourceConfig};
pub use error::{Error, Result};
pub use insights::{
    compute_insights, AttributionPolicy, InsightEngine, InsightOptions, InsightsSnapshot,
};
pub use models::{Category, ExpenseRecord, Payer, People, RawExpense, YearMonth};
pub use render::{render_all, CsvTableRenderer, JsonRenderer, RenderedArtifact, ReportRenderer};
pub use report::{MonthlyReportModel, ReportAssembler};
pub use source::{
    load_records, CsvFileSource, JsonCache, LoadOrigin, LoadedRecords, MockSource, RecordSource,
    SheetSource,
};
pub use validate::{ingest, validate, IngestReport, RejectedRow, ValidationContext, ValidationError};
