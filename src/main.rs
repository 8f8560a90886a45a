use std::sync::Arc;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use daylog::cmd::config::{self as config_cmd, ConfigArgs};
use daylog::cmd::read::{self, ReadCommandArgs};
use daylog::cmd::record::{self, RecordCommandArgs};
use daylog::config::AppConfig;
use daylog::context::AppContext;
use daylog::domain::cutoff::CommitCutoff;
use daylog::domain::record::SheetRange;
use daylog::error::{AppError, AppResult};
use daylog::infra::{GitLabClient, GoogleSheetsClient, OpenAiClient};

#[derive(Parser)]
#[command(
    name = "daylog",
    author,
    version,
    about = "Summarize recent commits and record them in a spreadsheet"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize recent commits on every branch and append the summary row.
    Record(RecordArgs),
    /// Print previously recorded rows.
    Read(ReadArgs),
    /// Inspect configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct RecordArgs {
    /// Cutoff policy: today, <n>h, <n>d, YYYY-MM-DD or an RFC 3339 timestamp.
    #[arg(long, value_parser = parse_cutoff)]
    since: Option<CommitCutoff>,
    /// Print the summary without appending it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ReadArgs {
    /// Range in A1 notation; defaults to the configured read range.
    #[arg(short, long, value_parser = parse_range)]
    range: Option<SheetRange>,
    /// Print rows as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_cutoff(value: &str) -> Result<CommitCutoff, String> {
    CommitCutoff::parse(value).ok_or_else(|| format!("invalid cutoff '{value}'"))
}

fn parse_range(value: &str) -> Result<SheetRange, String> {
    SheetRange::parse(value).ok_or_else(|| format!("invalid range '{value}'"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command, &config);
            Ok(())
        }
        Commands::Record(args) => run_record(config, args).await,
        Commands::Read(args) => run_read(config, args).await,
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    let source_control = Arc::new(GitLabClient::new(
        config.gitlab_base_url.clone(),
        config.gitlab_token.clone(),
        config.http_timeout,
    )?);
    let language_model = Arc::new(OpenAiClient::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.http_timeout,
    )?);
    let spreadsheet = Arc::new(GoogleSheetsClient::new(
        config.sheets_base_url.clone(),
        config.spreadsheet_id.clone(),
        config.google_credential.clone(),
        config.http_timeout,
    )?);

    Ok(AppContext::new(
        config,
        source_control,
        language_model,
        spreadsheet,
    ))
}

fn warn_missing_sheet_settings(config: &AppConfig) {
    if config.spreadsheet_id.is_none() {
        warn!("SPREAD_SHEET_ID not configured; spreadsheet access will fail.");
    }
    if config.google_credential.is_none() {
        warn!("Neither GOOGLE_ACCESS_TOKEN nor GOOGLE_API_KEY configured; spreadsheet access will fail.");
    }
}

async fn run_record(config: AppConfig, args: RecordArgs) -> AppResult<()> {
    if config.gitlab_token.is_none() {
        warn!("GITLAB_ACCESS_TOKEN not configured; only public projects can be read.");
    }
    if config.repository.is_none() {
        return Err(AppError::Configuration(
            "GITLAB_PROJECT_ID not configured".to_string(),
        ));
    }
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not configured; summarization will fail when there are commits.");
    }
    if !args.dry_run {
        warn_missing_sheet_settings(&config);
    }

    let context = build_context(config)?;
    let now = Local::now().fixed_offset();
    let outcome = record::run(
        &context,
        RecordCommandArgs {
            since: args.since,
            dry_run: args.dry_run,
        },
        now,
    )
    .await?;

    println!("{}", outcome.summary);
    if outcome.appended {
        eprintln!(
            "Recorded row for {} in {}",
            outcome.record.date_label, context.config.append_range
        );
    }
    Ok(())
}

async fn run_read(config: AppConfig, args: ReadArgs) -> AppResult<()> {
    warn_missing_sheet_settings(&config);

    let context = build_context(config)?;
    let args = ReadCommandArgs {
        range: args.range,
        json: args.json,
    };
    let records = read::run(&context, &args).await?;
    let rendered = read::render(&records, args.json)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}
