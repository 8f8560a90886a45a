use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode, Url, header::ACCEPT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::branch::{Branch, RepositoryId};
use crate::domain::commit::CommitMessageBatch;
use crate::error::{AppError, AppResult};
use crate::services::SourceControlService;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const NEXT_PAGE_HEADER: &str = "x-next-page";
const PER_PAGE: u32 = 100;
const MAX_PAGES: u32 = 50;

pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GitLabClient {
    pub fn new(base_url: String, token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|err| {
            AppError::Configuration(format!("failed to build GitLab HTTP client: {err}"))
        })?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn repository_endpoint(&self, repository: &RepositoryId, resource: &str) -> AppResult<Url> {
        let mut url = Url::parse(self.base_url.trim_end_matches('/')).map_err(|err| {
            AppError::Configuration(format!("invalid GitLab base URL '{}': {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Configuration(format!(
                    "GitLab base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "api",
                "v4",
                "projects",
                repository.as_str(),
                "repository",
                resource,
            ]);
        Ok(url)
    }

    /// Follows `X-Next-Page` until the provider reports no further page. Without
    /// a token the request is sent anonymously, which GitLab allows for public
    /// projects.
    async fn fetch_all_pages<T>(
        &self,
        endpoint: Url,
        query: &[(&str, String)],
        repository: &RepositoryId,
    ) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            debug!(url = %endpoint, page, "Requesting GitLab page");

            let mut request = self
                .http
                .get(endpoint.clone())
                .header(ACCEPT, "application/json")
                .query(query)
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            if let Some(token) = self.token.as_deref() {
                request = request.header(TOKEN_HEADER, token);
            }
            let response = request
                .send()
                .await
                .map_err(|err| AppError::RepositoryAccess(format!("failed to call GitLab: {err}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unable to read response>".to_string());
                return Err(status_error(status, repository, &body));
            }

            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u32>().ok());

            let batch: Vec<T> = response.json().await.map_err(|err| {
                AppError::RepositoryAccess(format!("failed to parse GitLab response: {err}"))
            })?;
            items.extend(batch);

            match next_page {
                Some(next) if next > page => page = next,
                _ => break,
            }

            if page > MAX_PAGES {
                warn!(
                    repository = %repository,
                    "Reached {MAX_PAGES}-page safety limit while paging GitLab results"
                );
                break;
            }
        }

        Ok(items)
    }
}

fn status_error(status: StatusCode, repository: &RepositoryId, body: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::RepositoryAccess(format!(
            "GitLab authentication failed ({status}) for repository {repository}"
        )),
        StatusCode::NOT_FOUND => AppError::RepositoryAccess(format!(
            "repository {repository} not found on GitLab: {body}"
        )),
        _ => AppError::RepositoryAccess(format!("GitLab responded with {status}: {body}")),
    }
}

#[async_trait]
impl SourceControlService for GitLabClient {
    async fn list_branches(&self, repository: &RepositoryId) -> AppResult<Vec<Branch>> {
        let endpoint = self.repository_endpoint(repository, "branches")?;
        let branches: Vec<GitLabBranch> = self.fetch_all_pages(endpoint, &[], repository).await?;
        debug!(repository = %repository, count = branches.len(), "Listed GitLab branches");
        Ok(branches
            .into_iter()
            .map(|branch| Branch::new(branch.name))
            .collect())
    }

    async fn list_commit_messages(
        &self,
        repository: &RepositoryId,
        branch: &Branch,
        since: DateTime<Utc>,
    ) -> AppResult<CommitMessageBatch> {
        let endpoint = self.repository_endpoint(repository, "commits")?;
        let query = [
            ("ref_name", branch.name.clone()),
            ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        let commits: Vec<GitLabCommit> = self.fetch_all_pages(endpoint, &query, repository).await?;
        debug!(
            repository = %repository,
            branch = %branch.name,
            count = commits.len(),
            "Listed GitLab commits"
        );
        Ok(CommitMessageBatch::new(
            branch,
            commits.into_iter().map(|commit| commit.message).collect(),
        ))
    }
}

#[derive(Deserialize)]
struct GitLabBranch {
    name: String,
}

#[derive(Deserialize)]
struct GitLabCommit {
    #[serde(default)]
    message: String,
}
