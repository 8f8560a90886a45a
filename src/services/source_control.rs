use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::branch::{Branch, RepositoryId};
use crate::domain::commit::CommitMessageBatch;
use crate::error::AppResult;

#[async_trait]
pub trait SourceControlService: Send + Sync {
    /// Branches in the order the provider reports them.
    async fn list_branches(&self, repository: &RepositoryId) -> AppResult<Vec<Branch>>;

    /// Messages of commits on `branch` made at or after `since`. A branch
    /// with nothing recent yields an empty batch.
    async fn list_commit_messages(
        &self,
        repository: &RepositoryId,
        branch: &Branch,
        since: DateTime<Utc>,
    ) -> AppResult<CommitMessageBatch>;
}
