use chrono::{DateTime, FixedOffset};
use tracing::info;

use crate::context::AppContext;
use crate::domain::cutoff::CommitCutoff;
use crate::domain::record::{Record, SheetRange};
use crate::domain::summary::Summary;
use crate::error::AppResult;
use crate::workflow::collect::collect_recent_messages;
use crate::workflow::summarize::summarize_messages;

#[derive(Debug)]
pub struct RecordWorkflowOutcome {
    pub record: Record,
    pub summary: Summary,
    pub appended: bool,
}

/// Enumerates branches, collects and aggregates recent commit messages, and
/// summarizes them. Nothing is written.
pub async fn summarize_recent_activity(
    ctx: &AppContext,
    cutoff: &CommitCutoff,
    now: DateTime<FixedOffset>,
) -> AppResult<Summary> {
    let repository = ctx.config.repository()?;
    let since = cutoff.resolve(now)?;

    let messages = collect_recent_messages(
        ctx.source_control.as_ref(),
        repository,
        since,
        ctx.config.collect_concurrency,
    )
    .await?;

    summarize_messages(
        ctx.language_model.as_ref(),
        &messages,
        ctx.config.summary_max_tokens,
    )
    .await
}

/// Runs the full pipeline and appends `(today, summary)` to the configured
/// append range. The append is the only side effect and happens last, so a
/// failure in any earlier stage leaves the sheet untouched.
pub async fn generate_and_append_record(
    ctx: &AppContext,
    cutoff: &CommitCutoff,
    now: DateTime<FixedOffset>,
) -> AppResult<RecordWorkflowOutcome> {
    let outcome = prepare_record(ctx, cutoff, now).await?;

    ctx.spreadsheet
        .append_record(&ctx.config.append_range, &outcome.record)
        .await?;
    info!(range = %ctx.config.append_range, "Recorded activity summary");

    Ok(RecordWorkflowOutcome {
        appended: true,
        ..outcome
    })
}

/// Same as [`generate_and_append_record`] without the append.
pub async fn prepare_record(
    ctx: &AppContext,
    cutoff: &CommitCutoff,
    now: DateTime<FixedOffset>,
) -> AppResult<RecordWorkflowOutcome> {
    let summary = summarize_recent_activity(ctx, cutoff, now).await?;
    let record = Record::new(now.date_naive(), summary.as_str());
    Ok(RecordWorkflowOutcome {
        record,
        summary,
        appended: false,
    })
}

pub async fn read_records(ctx: &AppContext, range: Option<&SheetRange>) -> AppResult<Vec<Record>> {
    let range = range.unwrap_or(&ctx.config.read_range);
    let records = ctx.spreadsheet.read_records(range).await?;
    info!(range = %range, rows = records.len(), "Read recorded rows");
    Ok(records)
}
