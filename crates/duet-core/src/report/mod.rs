//! Report assembly
//!
//! Turns a validated record set into one [`MonthlyReportModel`] per month:
//! summary, tables, budget metrics and chart specs. Renderers in
//! [`crate::render`] turn the models into files.

pub mod assembler;
pub mod types;

pub use assembler::{ReportAssembler, MISSING_VALUE};
pub use types::{
    ChartId, ChartKind, ChartSpec, DataPoint, DistributionRow, MetricRow, MonthlyReportModel,
    SummaryBlock, TableRow,
};
