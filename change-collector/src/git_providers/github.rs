//! GitHub provider (REST v3) for commit comparisons and PR comments.
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}/compare/{base}...{head}
//!   * POST /repos/{owner}/{repo}/issues/{number}/comments

use crate::errors::{ChangeCollectorResult, ProviderError};
use crate::git_providers::types::*;
use reqwest::{Client, Response, header};
use serde::Serialize;
use tracing::{debug, warn};

/// The compare endpoint lists at most this many files.
const COMPARE_FILE_LIMIT: usize = 300;

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // "https://api.github.com"
    token: String,
}

impl GitHubClient {
    /// Constructs a GitHub client with a shared HTTP instance and auth token.
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        debug!("Creating GitHubClient with base_api={}", base_api);
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Compares two commits and returns the status plus changed files.
    pub async fn compare_commits(
        &self,
        repo: &RepoRef,
        base: &str,
        head: &str,
    ) -> ChangeCollectorResult<Comparison> {
        let url = compare_url(&self.base_api, repo, base, head);
        debug!("GitHub compare_commits: {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        let comparison: Comparison = check_status(resp)?.json().await?;

        if comparison.files.len() >= COMPARE_FILE_LIMIT {
            warn!(
                files = comparison.files.len(),
                "comparison reached the provider file limit; list may be truncated"
            );
        }

        debug!(
            status = ?comparison.status,
            ahead_by = comparison.ahead_by,
            behind_by = comparison.behind_by,
            files = comparison.files.len(),
            "comparison fetched"
        );

        Ok(comparison)
    }

    /// Posts a top-level comment on an issue or pull request.
    pub async fn create_issue_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> ChangeCollectorResult<PostedComment> {
        let url = issue_comments_url(&self.base_api, repo, number);
        debug!("GitHub create_issue_comment: url={}, bytes={}", url, body.len());

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&IssueCommentCreate { body })
            .send()
            .await?;

        let posted: PostedComment = check_status(resp)?.json().await?;
        Ok(posted)
    }
}

/// Turns non-2xx responses into [`ProviderError`], keeping `Retry-After`.
fn check_status(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let retry_after_secs = resp
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    warn!(status = status.as_u16(), url = %resp.url(), "GitHub request failed");
    Err(ProviderError::from_status(status.as_u16(), retry_after_secs))
}

fn compare_url(base_api: &str, repo: &RepoRef, base: &str, head: &str) -> String {
    format!(
        "{}/repos/{}/{}/compare/{}...{}",
        base_api,
        urlencoding::encode(&repo.owner),
        urlencoding::encode(&repo.repo),
        urlencoding::encode(base),
        urlencoding::encode(head)
    )
}

fn issue_comments_url(base_api: &str, repo: &RepoRef, number: u64) -> String {
    format!(
        "{}/repos/{}/{}/issues/{}/comments",
        base_api,
        urlencoding::encode(&repo.owner),
        urlencoding::encode(&repo.repo),
        number
    )
}

#[derive(Debug, Serialize)]
struct IssueCommentCreate<'a> {
    body: &'a str,
}
