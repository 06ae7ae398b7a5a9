//! CSV record source
//!
//! Expected header: `description,amount,paid_by,category,date`. Column order
//! is taken from the header, so exports with reordered or extra columns
//! still load.

use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::RawExpense;

use super::RecordSource;

pub const CSV_HEADER: [&str; 5] = ["description", "amount", "paid_by", "category", "date"];

/// Parse expense rows from CSV.
///
/// Cells are kept as text; a short row yields empty cells which validation
/// later rejects with the right field name.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawExpense>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = column_positions(&headers)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let cell = |i: usize| record.get(columns[i]).unwrap_or("").to_string();
        rows.push(RawExpense::new(cell(0), cell(1), cell(2), cell(3), cell(4)));
    }

    debug!("Parsed {} CSV rows", rows.len());
    Ok(rows)
}

/// Position of each expected column, matched case-insensitively
fn column_positions(headers: &StringRecord) -> Result<[usize; 5]> {
    let mut positions = [0usize; 5];
    for (slot, name) in positions.iter_mut().zip(CSV_HEADER) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                Error::InvalidData(format!(
                    "CSV header is missing '{}' (expected: {})",
                    name,
                    CSV_HEADER.join(",")
                ))
            })?;
    }
    Ok(positions)
}

/// Rows read from a CSV file on disk
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for CsvFileSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self) -> Result<Vec<RawExpense>> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            Error::Source(format!("Cannot open {}: {}", self.path.display(), e))
        })?;
        parse_csv(file)
    }
}
