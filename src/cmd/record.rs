use chrono::{DateTime, FixedOffset};

use crate::context::AppContext;
use crate::domain::cutoff::CommitCutoff;
use crate::error::AppResult;
use crate::workflow::record::{RecordWorkflowOutcome, generate_and_append_record, prepare_record};

#[derive(Debug, Clone, Default)]
pub struct RecordCommandArgs {
    /// Overrides the configured cutoff policy.
    pub since: Option<CommitCutoff>,
    pub dry_run: bool,
}

pub async fn run(
    ctx: &AppContext,
    args: RecordCommandArgs,
    now: DateTime<FixedOffset>,
) -> AppResult<RecordWorkflowOutcome> {
    let cutoff = args.since.unwrap_or_else(|| ctx.config.commit_since.clone());
    if args.dry_run {
        prepare_record(ctx, &cutoff, now).await
    } else {
        generate_and_append_record(ctx, &cutoff, now).await
    }
}
