use std::io;

use crate::context::AppContext;
use crate::domain::record::{Record, SheetRange};
use crate::error::{AppError, AppResult};
use crate::workflow::record::read_records;

#[derive(Debug, Clone, Default)]
pub struct ReadCommandArgs {
    pub range: Option<SheetRange>,
    pub json: bool,
}

pub async fn run(ctx: &AppContext, args: &ReadCommandArgs) -> AppResult<Vec<Record>> {
    read_records(ctx, args.range.as_ref()).await
}

pub fn render(records: &[Record], json: bool) -> AppResult<String> {
    if json {
        return serde_json::to_string_pretty(records)
            .map_err(|err| AppError::Io(io::Error::from(err)));
    }
    Ok(records
        .iter()
        .map(|record| format!("{}\t{}", record.date_label, record.summary))
        .collect::<Vec<_>>()
        .join("\n"))
}
