//! Record sources
//!
//! A source hands over raw, unvalidated rows. Validation happens once, in
//! [`load_records`], no matter where the rows came from.
//!
//! Sources:
//! - [`CsvFileSource`] - a local CSV export
//! - [`SheetSource`] - a Google Sheet fetched through its CSV export link
//! - [`MockSource`] - fixed rows or a forced failure, for tests and dry runs
//!
//! [`JsonCache`] keeps the last good load on disk so reports still work when
//! the sheet can't be reached.

mod cache;
mod csv;
mod loader;
mod mock;
mod sheet;

pub use self::cache::{CachedExpenses, JsonCache};
pub use self::csv::{parse_csv, CsvFileSource, CSV_HEADER};
pub use self::loader::{load_records, LoadOrigin, LoadedRecords};
pub use self::mock::MockSource;
pub use self::sheet::{sheet_export_url, SheetSource};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RawExpense;

/// Anything that can produce raw expense rows
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch every row. Rows are returned unvalidated, in source order.
    async fn fetch(&self) -> Result<Vec<RawExpense>>;
}
