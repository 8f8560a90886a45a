use tracing::{debug, info};

use crate::domain::commit::AggregatedMessages;
use crate::domain::completion::{ChatMessage, CompletionRequest, SamplingConfig};
use crate::domain::summary::Summary;
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

const PERSONA: &str = "You are a developer working on a team project.";
const INSTRUCTIONS: &str = "Generate a summary message of the commit messages below. \
Summarize each item in 30 to 50 words and reply with the summary content only.";

pub fn build_summary_request(messages: &AggregatedMessages, max_tokens: u32) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system(PERSONA),
            ChatMessage::user(INSTRUCTIONS),
            ChatMessage::user(format!(
                "Here are the commit messages, one JSON string per line:\n{}",
                messages.join_for_prompt()
            )),
        ],
        sampling: SamplingConfig::deterministic(max_tokens),
    }
}

/// Summarizes the aggregated commit messages. No messages means no completion
/// call: the sentinel summary is returned instead.
pub async fn summarize_messages(
    language_model: &dyn LanguageModelService,
    messages: &AggregatedMessages,
    max_tokens: u32,
) -> AppResult<Summary> {
    if messages.is_empty() {
        info!("No commit messages to summarize");
        return Ok(Summary::no_commits());
    }

    let request = build_summary_request(messages, max_tokens);
    let candidates = language_model.complete(&request).await?;
    debug!(candidates = candidates.len(), "Completion returned");

    let first = candidates.into_iter().next().ok_or_else(|| {
        AppError::Summarization("failed to generate a completion: no candidates returned".to_string())
    })?;

    Ok(Summary::from_completion(&first.content))
}
