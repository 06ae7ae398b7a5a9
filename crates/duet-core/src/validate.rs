//! Record validation: raw sheet rows to [`ExpenseRecord`]s
//!
//! Every rejection names the offending field. Batch ingest never aborts on a
//! bad row; rejected rows are collected and logged so the caller can report
//! them.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Category, ExpenseRecord, People, RawExpense};

/// The field of a raw row that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Description,
    Amount,
    PaidBy,
    Category,
    Date,
}

impl RecordField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Amount => "amount",
            Self::PaidBy => "paid_by",
            Self::Category => "category",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("description: must not be empty")]
    EmptyDescription,

    #[error("amount: '{0}' is not a positive number")]
    InvalidAmount(String),

    #[error("paid_by: unknown payer '{0}'")]
    UnknownPayer(String),

    #[error("category: unknown category '{0}'")]
    UnknownCategory(String),

    #[error("date: unable to parse '{0}'")]
    InvalidDate(String),
}

impl ValidationError {
    pub fn field(&self) -> RecordField {
        match self {
            Self::EmptyDescription => RecordField::Description,
            Self::InvalidAmount(_) => RecordField::Amount,
            Self::UnknownPayer(_) => RecordField::PaidBy,
            Self::UnknownCategory(_) => RecordField::Category,
            Self::InvalidDate(_) => RecordField::Date,
        }
    }
}

/// Everything validation needs besides the row itself
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub people: People,
    /// Year applied to dates written without one ("3/28", "03-28")
    pub default_year: i32,
}

impl ValidationContext {
    pub fn new(people: People, default_year: i32) -> Self {
        Self {
            people,
            default_year,
        }
    }
}

/// Validate one raw row
pub fn validate(
    raw: &RawExpense,
    ctx: &ValidationContext,
) -> Result<ExpenseRecord, ValidationError> {
    let description = raw.description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }

    let amount = parse_amount(&raw.amount)?;

    let payer = ctx
        .people
        .resolve(&raw.paid_by)
        .ok_or_else(|| ValidationError::UnknownPayer(raw.paid_by.clone()))?;

    let category: Category = raw
        .category
        .parse()
        .map_err(|_| ValidationError::UnknownCategory(raw.category.clone()))?;

    let date = parse_date(&raw.date, ctx.default_year)?;

    ExpenseRecord::new(description, amount, payer, category, date)
}

/// Parse an amount string, handling currency symbols and thousands separators
pub fn parse_amount(s: &str) -> Result<f64, ValidationError> {
    let cleaned: String = s.trim().replace(['$', ',', ' '], "");

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ValidationError::InvalidAmount(s.to_string())),
    }
}

/// Parse a date in any of the accepted sheet formats
pub fn parse_date(s: &str, default_year: i32) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    let invalid = || ValidationError::InvalidDate(s.to_string());
    if s.is_empty() {
        return Err(invalid());
    }

    // Two-digit years first: chrono's %Y happily reads "24" as year 24
    if s.rsplit('/').next().is_some_and(|year| year.len() == 2) {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%y") {
            return Ok(date);
        }
    }

    // %Y also takes one to three digits, so the year field must be four long
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    let fields: Vec<&str> = date_part.split(['/', '-']).collect();
    let is_year = |field: Option<&&str>| {
        field.is_some_and(|f| f.len() == 4 && f.bytes().all(|b| b.is_ascii_digit()))
    };
    let year_first = fields.len() == 3 && is_year(fields.first());
    let year_last = fields.len() == 3 && is_year(fields.last());

    let formats = [
        ("%Y-%m-%d", year_first), // 2024-01-15
        ("%m/%d/%Y", year_last),  // 01/15/2024
        ("%Y/%m/%d", year_first), // 2024/01/15
        ("%m-%d-%Y", year_last),  // 01-15-2024
    ];
    for (fmt, _) in formats.iter().filter(|(_, allowed)| *allowed) {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // ISO-8601 date-time, time of day is dropped
    if year_first {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.date_naive());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(dt.date());
            }
        }
    }

    // Month/day without a year
    let parts: Vec<&str> = s.split(['/', '-']).collect();
    if parts.len() == 2 {
        let month = parts[0].parse::<u32>().map_err(|_| invalid())?;
        let day = parts[1].parse::<u32>().map_err(|_| invalid())?;
        return NaiveDate::from_ymd_opt(default_year, month, day).ok_or_else(invalid);
    }

    Err(invalid())
}

/// A row that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Zero-based position in the input batch
    pub row: usize,
    pub raw: RawExpense,
    pub error: ValidationError,
}

/// Outcome of validating a batch of raw rows
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Valid records, in input order
    pub records: Vec<ExpenseRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl IngestReport {
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Validate a batch of rows, keeping the good ones
pub fn ingest(rows: &[RawExpense], ctx: &ValidationContext) -> IngestReport {
    let mut report = IngestReport::default();

    for (row, raw) in rows.iter().enumerate() {
        match validate(raw, ctx) {
            Ok(record) => report.records.push(record),
            Err(error) => {
                tracing::warn!(
                    row,
                    field = error.field().as_str(),
                    error = %error,
                    "Dropping invalid expense row"
                );
                report.rejected.push(RejectedRow {
                    row,
                    raw: raw.clone(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        accepted = report.records.len(),
        rejected = report.rejected.len(),
        "Ingest complete"
    );
    report
}
