use async_trait::async_trait;

use crate::domain::completion::{Candidate, CompletionRequest};
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Issues one chat-completion call and returns every candidate in the
    /// order the provider sent them.
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Vec<Candidate>>;
}
