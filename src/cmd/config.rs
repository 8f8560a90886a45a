use clap::{Args, Subcommand};

use crate::config::{AppConfig, GoogleCredential};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand, config: &AppConfig) {
    match command {
        ConfigCommand::Show => println!("{}", render_show(config)),
    }
}

fn render_show(config: &AppConfig) -> String {
    let repository = config.repository.as_ref().map(|id| id.to_string());
    let credential = match &config.google_credential {
        Some(GoogleCredential::AccessToken(token)) => {
            format!("access token {}", mask_secret(&Some(token.clone())))
        }
        Some(GoogleCredential::ApiKey(key)) => format!("API key {}", mask_secret(&Some(key.clone()))),
        None => "<not set>".to_string(),
    };

    [
        format!("GitLab base URL: {}", config.gitlab_base_url),
        format!("GitLab access token: {}", mask_secret(&config.gitlab_token)),
        format!("GitLab project: {}", display_value(&repository)),
        format!("Commit cutoff: {}", config.commit_since),
        format!("Branch collection concurrency: {}", config.collect_concurrency),
        format!("Completion base URL: {}", config.openai_base_url),
        format!("Completion API key: {}", mask_secret(&config.openai_api_key)),
        format!("Completion model: {}", config.openai_model),
        format!("Summary max tokens: {}", config.summary_max_tokens),
        format!("Sheets base URL: {}", config.sheets_base_url),
        format!("Spreadsheet: {}", display_value(&config.spreadsheet_id)),
        format!("Sheets credential: {credential}"),
        format!("Read range: {}", config.read_range),
        format!("Append range: {}", config.append_range),
        format!("HTTP timeout: {}s", config.http_timeout.as_secs()),
    ]
    .join("\n")
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
