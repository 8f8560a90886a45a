use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::completion::{Candidate, CompletionRequest};
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

/// Chat-completions client for OpenAI and compatible servers.
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|err| {
            AppError::Configuration(format!("failed to build OpenAI HTTP client: {err}"))
        })?;
        Ok(Self {
            http,
            base_url,
            api_key,
            model,
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("OpenAI API key not configured".to_string()))
    }

    fn completions_endpoint(base_url: &str) -> String {
        format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Vec<Candidate>> {
        let api_key = self.api_key()?;
        let body = ChatCompletionRequest::new(&self.model, request);
        let url = Self::completions_endpoint(&self.base_url);

        info!(url = %url, model = %self.model, messages = body.messages.len(), "Sending completion request");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                AppError::Summarization(format!("failed to call completion API: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Summarization(format!(
                "completion API responded with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::Summarization(format!("failed to parse completion response: {err}"))
        })?;

        debug!(choices = payload.choices.len(), "Received completion response");

        Ok(payload
            .choices
            .into_iter()
            .map(|choice| Candidate::new(choice.message.content.unwrap_or_default()))
            .collect())
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    n: u8,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        Self {
            model,
            messages: request
                .messages
                .iter()
                .map(|message| ChatCompletionMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            max_tokens: request.sampling.max_tokens,
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            n: request.sampling.candidates,
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionChoiceMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChoiceMessage {
    content: Option<String>,
}
