use async_trait::async_trait;

use crate::domain::record::{Record, SheetRange};
use crate::error::AppResult;

#[async_trait]
pub trait SpreadsheetService: Send + Sync {
    async fn read_records(&self, range: &SheetRange) -> AppResult<Vec<Record>>;

    /// Inserts `record` as a new row after the table anchored at `range`.
    /// Existing rows are never overwritten; repeated calls add repeated rows.
    async fn append_record(&self, range: &SheetRange, record: &Record) -> AppResult<()>;
}
