use std::env;
use std::time::Duration;

use crate::domain::branch::RepositoryId;
use crate::domain::cutoff::CommitCutoff;
use crate::domain::record::SheetRange;
use crate::error::{AppError, AppResult};

pub const DEFAULT_GITLAB_BASE_URL: &str = "https://gitlab.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_READ_RANGE: &str = "Sheet1!A2:B";
pub const DEFAULT_APPEND_RANGE: &str = "Sheet1!A1:B1";
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 150;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gitlab_base_url: String,
    pub gitlab_token: Option<String>,
    pub repository: Option<RepositoryId>,
    pub commit_since: CommitCutoff,
    pub collect_concurrency: usize,
    pub openai_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub summary_max_tokens: u32,
    pub sheets_base_url: String,
    pub spreadsheet_id: Option<String>,
    pub google_credential: Option<GoogleCredential>,
    /// Independent of `append_range`: reads skip the header row while the
    /// append anchor points at the table's first row.
    pub read_range: SheetRange,
    pub append_range: SheetRange,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleCredential {
    AccessToken(String),
    /// Only good for reading publicly shared sheets.
    ApiKey(String),
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let repository = match get("GITLAB_PROJECT_ID") {
            Some(raw) => Some(RepositoryId::new(raw.as_str()).ok_or_else(|| {
                AppError::Configuration(format!("invalid GITLAB_PROJECT_ID '{raw}'"))
            })?),
            None => None,
        };

        let commit_since = match get("DAYLOG_COMMIT_SINCE") {
            Some(raw) => CommitCutoff::parse(&raw).ok_or_else(|| {
                AppError::Configuration(format!(
                    "invalid DAYLOG_COMMIT_SINCE '{raw}' (expected today, <n>h, <n>d, YYYY-MM-DD or RFC 3339)"
                ))
            })?,
            None => CommitCutoff::default(),
        };

        let collect_concurrency: usize = parse_number(&get, "DAYLOG_COLLECT_CONCURRENCY", 1)?;
        if collect_concurrency == 0 {
            return Err(AppError::Configuration(
                "DAYLOG_COLLECT_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let google_credential = get("GOOGLE_ACCESS_TOKEN")
            .map(GoogleCredential::AccessToken)
            .or_else(|| get("GOOGLE_API_KEY").map(GoogleCredential::ApiKey));

        Ok(Self {
            gitlab_base_url: get("GITLAB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GITLAB_BASE_URL.to_string()),
            gitlab_token: get("GITLAB_ACCESS_TOKEN"),
            repository,
            commit_since,
            collect_concurrency,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            summary_max_tokens: parse_number(
                &get,
                "DAYLOG_SUMMARY_MAX_TOKENS",
                DEFAULT_SUMMARY_MAX_TOKENS,
            )?,
            sheets_base_url: get("SHEETS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string()),
            spreadsheet_id: get("SPREAD_SHEET_ID"),
            google_credential,
            read_range: parse_range(&get, "DAYLOG_READ_RANGE", DEFAULT_READ_RANGE)?,
            append_range: parse_range(&get, "DAYLOG_APPEND_RANGE", DEFAULT_APPEND_RANGE)?,
            http_timeout: Duration::from_secs(parse_number(
                &get,
                "DAYLOG_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }

    pub fn repository(&self) -> AppResult<&RepositoryId> {
        self.repository
            .as_ref()
            .ok_or_else(|| AppError::Configuration("GITLAB_PROJECT_ID not configured".to_string()))
    }
}

fn parse_number<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> AppResult<T>
where
    T: std::str::FromStr,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::Configuration(format!("invalid {key} '{raw}'"))),
        None => Ok(default),
    }
}

fn parse_range(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> AppResult<SheetRange> {
    let raw = get(key).unwrap_or_else(|| default.to_string());
    SheetRange::parse(&raw)
        .ok_or_else(|| AppError::Configuration(format!("invalid {key} '{raw}'")))
}
