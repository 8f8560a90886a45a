//! Shared fakes for integration tests.
//!
//! Not every helper is used by every test file.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use daylog::config::AppConfig;
use daylog::context::AppContext;
use daylog::domain::branch::{Branch, RepositoryId};
use daylog::domain::commit::CommitMessageBatch;
use daylog::domain::completion::{Candidate, CompletionRequest};
use daylog::domain::record::{Record, SheetRange};
use daylog::error::{AppError, AppResult};
use daylog::services::{LanguageModelService, SourceControlService, SpreadsheetService};

/// 2024-01-26 09:00 UTC.
pub fn run_time() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 26, 9, 0, 0)
        .unwrap()
}

pub fn start_of_run_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 26, 0, 0, 0).unwrap()
}

pub fn test_config(extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("GITLAB_PROJECT_ID".into(), "43738396".into());
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

#[derive(Default)]
pub struct FakeSourceControl {
    branches: Vec<String>,
    commits: HashMap<String, Vec<String>>,
    delays_ms: HashMap<String, u64>,
    fail_listing: bool,
    fail_branch: Option<String>,
    pub commit_calls: Mutex<Vec<(String, DateTime<Utc>)>>,
}

impl FakeSourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, name: &str, messages: &[&str]) -> Self {
        self.branches.push(name.to_string());
        self.commits.insert(
            name.to_string(),
            messages.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn delayed(mut self, name: &str, millis: u64) -> Self {
        self.delays_ms.insert(name.to_string(), millis);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_branch(mut self, name: &str) -> Self {
        self.fail_branch = Some(name.to_string());
        self
    }

    pub fn visited_branches(&self) -> Vec<String> {
        self.commit_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(branch, _)| branch.clone())
            .collect()
    }
}

#[async_trait]
impl SourceControlService for FakeSourceControl {
    async fn list_branches(&self, _repository: &RepositoryId) -> AppResult<Vec<Branch>> {
        if self.fail_listing {
            return Err(AppError::RepositoryAccess(
                "GitLab authentication failed (401 Unauthorized)".to_string(),
            ));
        }
        Ok(self.branches.iter().map(Branch::new).collect())
    }

    async fn list_commit_messages(
        &self,
        _repository: &RepositoryId,
        branch: &Branch,
        since: DateTime<Utc>,
    ) -> AppResult<CommitMessageBatch> {
        self.commit_calls
            .lock()
            .unwrap()
            .push((branch.name.clone(), since));
        if let Some(millis) = self.delays_ms.get(&branch.name) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        if self.fail_branch.as_deref() == Some(branch.name.as_str()) {
            return Err(AppError::RepositoryAccess(format!(
                "failed to list commits on {}",
                branch.name
            )));
        }
        let messages = self.commits.get(&branch.name).cloned().unwrap_or_default();
        Ok(CommitMessageBatch::new(branch, messages))
    }
}

pub struct FakeLanguageModel {
    candidates: Vec<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeLanguageModel {
    pub fn replying(candidates: &[&str]) -> Self {
        Self {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModelService for FakeLanguageModel {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Vec<Candidate>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.candidates.iter().map(Candidate::new).collect())
    }
}

/// Sheet that only ever grows: appends push a new row after the existing ones.
#[derive(Default)]
pub struct InMemorySheet {
    rows: Mutex<Vec<Record>>,
    fail_appends: bool,
    pub append_ranges: Mutex<Vec<SheetRange>>,
}

impl InMemorySheet {
    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn failing_appends() -> Self {
        Self {
            fail_appends: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<Record> {
        self.rows.lock().unwrap().clone()
    }

    pub fn append_count(&self) -> usize {
        self.append_ranges.lock().unwrap().len()
    }
}

#[async_trait]
impl SpreadsheetService for InMemorySheet {
    async fn read_records(&self, _range: &SheetRange) -> AppResult<Vec<Record>> {
        Ok(self.rows())
    }

    async fn append_record(&self, range: &SheetRange, record: &Record) -> AppResult<()> {
        self.append_ranges.lock().unwrap().push(range.clone());
        if self.fail_appends {
            return Err(AppError::SpreadsheetAccess(
                "Google Sheets responded with 403 Forbidden".to_string(),
            ));
        }
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct Harness {
    pub source_control: Arc<FakeSourceControl>,
    pub language_model: Arc<FakeLanguageModel>,
    pub sheet: Arc<InMemorySheet>,
    pub context: AppContext,
}

impl Harness {
    pub fn new(
        config: AppConfig,
        source_control: FakeSourceControl,
        language_model: FakeLanguageModel,
        sheet: InMemorySheet,
    ) -> Self {
        let source_control = Arc::new(source_control);
        let language_model = Arc::new(language_model);
        let sheet = Arc::new(sheet);
        let context = AppContext::new(
            config,
            source_control.clone(),
            language_model.clone(),
            sheet.clone(),
        );
        Self {
            source_control,
            language_model,
            sheet,
            context,
        }
    }
}
