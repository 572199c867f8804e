//! One end-to-end run: compare → collect → analyse → comment.

use analysis_service::AnalysisClient;
use anyhow::Context;
use change_collector::{ActionContext, ComparisonStatus, GitHubClient, collect_changes};
use tracing::{error, info, warn};

/// How a run ended when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Unsupported event or nothing to compare.
    Skipped,
    /// Head is not ahead of base; nothing was sent.
    NotAhead(ComparisonStatus),
    /// Payload analysed; `comment_id` is set when a PR comment was posted.
    Analysed {
        files: usize,
        comment_id: Option<u64>,
    },
}

/// Runs the pipeline for a resolved context.
pub async fn run(
    ctx: &ActionContext,
    github: &GitHubClient,
    analysis: &AnalysisClient,
) -> anyhow::Result<Outcome> {
    info!(
        event = ?ctx.event,
        repo = %ctx.repo,
        base = %ctx.target.base,
        head = %ctx.target.head,
        "run started"
    );

    let comparison = github
        .compare_commits(&ctx.repo, &ctx.target.base, &ctx.target.head)
        .await
        .with_context(|| format!("comparing {}...{}", ctx.target.base, ctx.target.head))?;

    if comparison.status != ComparisonStatus::Ahead {
        error!(status = ?comparison.status, "head commit must be ahead of base commit");
        return Ok(Outcome::NotAhead(comparison.status));
    }

    let (files, stats) = collect_changes(comparison.files)?;

    let answer = analysis
        .submit(&files)
        .await
        .context("sending changes to the analysis service")?;

    let Some(number) = ctx.target.pr_number else {
        info!(answer = %answer, "no pull request to comment on");
        return Ok(Outcome::Analysed {
            files: stats.files,
            comment_id: None,
        });
    };

    if answer.trim().is_empty() {
        warn!(pr = number, "analysis service returned an empty body, no comment posted");
        return Ok(Outcome::Analysed {
            files: stats.files,
            comment_id: None,
        });
    }

    let posted = github
        .create_issue_comment(&ctx.repo, number, &answer)
        .await
        .with_context(|| format!("commenting on pull request #{number}"))?;

    info!(
        pr = number,
        comment_id = posted.id,
        url = posted.html_url.as_deref().unwrap_or(""),
        "comment posted"
    );

    Ok(Outcome::Analysed {
        files: stats.files,
        comment_id: Some(posted.id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_service::AnalysisServiceConfig;
    use change_collector::git_providers::ProviderConfig;
    use change_collector::{CompareTarget, EventKind, RepoRef};
    use test_support::{StubResponse, serve, serve_once};

    const AHEAD: &str = r#"{"status":"ahead","ahead_by":1,"behind_by":0,"total_commits":1,
        "files":[{"filename":"src/lib.rs","status":"modified","sha":"abc",
                  "patch":"@@ -1,2 +1,2 @@\n foo\n-bar\n+baz"}]}"#;

    fn http() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn context(github_url: &str, pr_number: Option<u64>) -> ActionContext {
        ActionContext {
            event: if pr_number.is_some() {
                EventKind::PullRequest
            } else {
                EventKind::Push
            },
            repo: RepoRef::parse("octo/hello").unwrap(),
            provider: ProviderConfig {
                base_api: github_url.to_string(),
                token: "t0ken".into(),
            },
            target: CompareTarget {
                base: "base1".into(),
                head: "head2".into(),
                pr_number,
            },
        }
    }

    fn github_for(ctx: &ActionContext) -> GitHubClient {
        GitHubClient::new(http(), ctx.provider.base_api.clone(), ctx.provider.token.clone())
    }

    fn analysis_for(endpoint: String) -> AnalysisClient {
        AnalysisClient::with_client(
            AnalysisServiceConfig {
                endpoint,
                timeout_secs: 5,
            },
            http(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn stops_when_head_is_not_ahead() {
        let (gh_url, gh) = serve(vec![StubResponse::json(
            "200 OK",
            r#"{"status":"behind","ahead_by":0,"behind_by":2,"total_commits":0,"files":[]}"#,
        )])
        .await;
        let ctx = context(&gh_url, Some(7));

        // Nothing listens here; reaching the analysis service would fail the run.
        let analysis = analysis_for("http://127.0.0.1:9/".into());

        let outcome = run(&ctx, &github_for(&ctx), &analysis).await.unwrap();
        assert_eq!(outcome, Outcome::NotAhead(ComparisonStatus::Behind));

        let requests = gh.await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("GET /repos/octo/hello/compare/base1...head2 HTTP/1.1"));
    }

    #[tokio::test]
    async fn push_sends_line_records_and_posts_no_comment() {
        let (gh_url, gh) = serve(vec![StubResponse::json("200 OK", AHEAD)]).await;
        let (an_url, an) = serve_once(StubResponse::text("200 OK", "Run: tests/lib_test.rs")).await;
        let ctx = context(&gh_url, None);

        let outcome = run(&ctx, &github_for(&ctx), &analysis_for(an_url)).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Analysed {
                files: 1,
                comment_id: None,
            }
        );

        let sent = an.await.unwrap();
        assert!(sent.starts_with("POST / HTTP/1.1"));
        assert!(sent.contains(r#""filename":"src/lib.rs""#));
        assert!(sent.contains(r#""sha":"abc""#));
        assert!(sent.contains(r#"{"modified":false,"lineContent":" foo","lineNumber":1}"#));
        assert!(sent.contains(r#"{"modified":true,"lineContent":"+baz","lineNumber":2}"#));
        assert!(!sent.contains("-bar"));

        assert_eq!(gh.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_answer_posts_nothing() {
        let (gh_url, gh) = serve(vec![StubResponse::json("200 OK", AHEAD)]).await;
        let (an_url, an) = serve_once(StubResponse::text("200 OK", " \n")).await;
        let ctx = context(&gh_url, Some(7));

        let outcome = run(&ctx, &github_for(&ctx), &analysis_for(an_url)).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Analysed {
                files: 1,
                comment_id: None,
            }
        );

        an.await.unwrap();
        assert_eq!(gh.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn pull_request_gets_the_answer_verbatim() {
        let (gh_url, gh) = serve(vec![
            StubResponse::json("200 OK", AHEAD),
            StubResponse::json("201 Created", r#"{"id":42,"html_url":"https://x/pull/7#c42"}"#),
        ])
        .await;
        let (an_url, an) = serve_once(StubResponse::text("200 OK", "Run: tests/lib_test.rs\n")).await;
        let ctx = context(&gh_url, Some(7));

        let outcome = run(&ctx, &github_for(&ctx), &analysis_for(an_url)).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Analysed {
                files: 1,
                comment_id: Some(42),
            }
        );

        an.await.unwrap();
        let requests = gh.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].starts_with("POST /repos/octo/hello/issues/7/comments HTTP/1.1"));
        assert!(requests[1].ends_with(r#"{"body":"Run: tests/lib_test.rs\n"}"#));
    }

    #[tokio::test]
    async fn analysis_failure_fails_the_run_without_commenting() {
        let (gh_url, gh) = serve(vec![StubResponse::json("200 OK", AHEAD)]).await;
        let (an_url, an) = serve_once(StubResponse::text("500 Internal Server Error", "boom")).await;
        let ctx = context(&gh_url, Some(7));

        let err = run(&ctx, &github_for(&ctx), &analysis_for(an_url)).await.unwrap_err();
        assert!(format!("{err:#}").contains("sending changes to the analysis service"));

        an.await.unwrap();
        assert_eq!(gh.await.unwrap().len(), 1);
    }
}
