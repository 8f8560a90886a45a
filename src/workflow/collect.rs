use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::domain::branch::RepositoryId;
use crate::domain::commit::{AggregatedMessages, CommitMessageBatch};
use crate::error::AppResult;
use crate::services::SourceControlService;

/// Lists every branch, gathers each branch's commits since `since`, and
/// flattens them in branch order.
///
/// At most `concurrency` branches are fetched at once. Results are consumed
/// in enumeration order regardless of completion order, and the first
/// failure aborts the remaining fetches.
pub async fn collect_recent_messages(
    source_control: &dyn SourceControlService,
    repository: &RepositoryId,
    since: DateTime<Utc>,
    concurrency: usize,
) -> AppResult<AggregatedMessages> {
    let branches = source_control.list_branches(repository).await?;
    info!(
        repository = %repository,
        branches = branches.len(),
        since = %since,
        "Collecting commits"
    );

    let batches: Vec<CommitMessageBatch> = stream::iter(branches.iter())
        .map(|branch| source_control.list_commit_messages(repository, branch, since))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    for batch in batches.iter().filter(|batch| batch.is_empty()) {
        debug!(branch = %batch.branch, "No commits since cutoff");
    }

    let messages = AggregatedMessages::aggregate(batches);
    info!(messages = messages.len(), "Aggregated commit messages");
    Ok(messages)
}
