//! GitHub Actions run context: which commits to compare and where to comment.
//!
//! Everything is read through a lookup function so the same code serves the
//! real environment (`std::env::var`) and tests.

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{ChangeCollectorResult, ConfigError, EventError};
use crate::git_providers::{DEFAULT_GITHUB_API, ProviderConfig, RepoRef};

/// Token variables in order of preference. Action inputs are exposed as
/// `INPUT_<NAME>` with the name upper-cased but dashes kept.
const TOKEN_VARS: &[&str] = &["INPUT_GITHUB-TOKEN", "INPUT_GITHUB_TOKEN", "GITHUB_TOKEN"];

/// `before` SHA GitHub sends for the first push of a new branch.
const NULL_SHA: &str = "0000000000000000000000000000000000000000";

/// Events the step reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PullRequest,
    Push,
}

impl EventKind {
    /// Maps `GITHUB_EVENT_NAME`; `None` for events the step ignores.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pull_request" | "pull_request_target" => Some(EventKind::PullRequest),
            "push" => Some(EventKind::Push),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            EventKind::PullRequest => "pull_request",
            EventKind::Push => "push",
        }
    }
}

/// Commits to compare plus the PR to comment on, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareTarget {
    pub base: String,
    pub head: String,
    /// Pull request number; `None` for pushes.
    pub pr_number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: Option<u64>,
    base: Option<CommitPointer>,
    head: Option<CommitPointer>,
}

#[derive(Debug, Deserialize)]
struct CommitPointer {
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushEvent {
    before: Option<String>,
    after: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CompareTarget {
    /// Extracts base/head from an event payload.
    ///
    /// Returns `Ok(None)` for a push that created a branch (no base commit).
    ///
    /// # Errors
    /// - [`EventError::Payload`] if the JSON does not match the event shape
    /// - [`EventError::MissingRefs`] if base or head is absent
    pub fn from_payload(kind: EventKind, payload: &str) -> Result<Option<Self>, EventError> {
        let missing = EventError::MissingRefs { event: kind.label() };

        match kind {
            EventKind::PullRequest => {
                let event: PullRequestEvent = serde_json::from_str(payload)?;
                let pr = event.pull_request.ok_or(missing)?;
                let base = non_empty(pr.base.and_then(|b| b.sha));
                let head = non_empty(pr.head.and_then(|h| h.sha));
                match (base, head) {
                    (Some(base), Some(head)) => Ok(Some(Self {
                        base,
                        head,
                        pr_number: pr.number,
                    })),
                    _ => Err(EventError::MissingRefs { event: kind.label() }),
                }
            }
            EventKind::Push => {
                let event: PushEvent = serde_json::from_str(payload)?;
                match (non_empty(event.before), non_empty(event.after)) {
                    (Some(before), Some(_)) if before == NULL_SHA => Ok(None),
                    (Some(base), Some(head)) => Ok(Some(Self {
                        base,
                        head,
                        pr_number: None,
                    })),
                    _ => Err(missing),
                }
            }
        }
    }
}

/// Everything a run needs from the CI environment.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub event: EventKind,
    pub repo: RepoRef,
    pub provider: ProviderConfig,
    pub target: CompareTarget,
}

impl ActionContext {
    /// Reads the context from the process environment.
    pub fn from_env() -> ChangeCollectorResult<Option<Self>> {
        Self::from_lookup(
            |k| std::env::var(k).ok(),
            |path| std::fs::read_to_string(path),
        )
    }

    /// Reads the context through `lookup` (variables) and `read_file`
    /// (event payload).
    ///
    /// Returns `Ok(None)` when the run should be skipped: unsupported event
    /// or a push without a base commit.
    ///
    /// # Errors
    /// Missing variables or token, an unreadable or malformed payload, and a
    /// payload without base/head commits.
    pub fn from_lookup<F, R>(lookup: F, read_file: R) -> ChangeCollectorResult<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
        R: Fn(&str) -> std::io::Result<String>,
    {
        let var = |name: &str| non_empty(lookup(name));

        let event_name = var("GITHUB_EVENT_NAME").ok_or(ConfigError::MissingVar("GITHUB_EVENT_NAME"))?;
        let Some(event) = EventKind::from_name(&event_name) else {
            info!(event = %event_name, "event not handled, skipping");
            return Ok(None);
        };

        let path = var("GITHUB_EVENT_PATH").ok_or(ConfigError::MissingVar("GITHUB_EVENT_PATH"))?;
        let payload = read_file(&path).map_err(|source| EventError::Io {
            path: path.clone(),
            source,
        })?;
        let Some(target) = CompareTarget::from_payload(event, &payload)? else {
            info!("push created a new branch, nothing to compare");
            return Ok(None);
        };

        let slug = var("GITHUB_REPOSITORY").ok_or(ConfigError::MissingVar("GITHUB_REPOSITORY"))?;
        let repo = RepoRef::parse(&slug)?;

        let token = TOKEN_VARS
            .iter()
            .find_map(|&name| var(name))
            .ok_or(ConfigError::MissingToken)?;
        let base_api = var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API.to_string());

        debug!(
            event = ?event,
            repo = %repo,
            base = %target.base,
            head = %target.head,
            pr = ?target.pr_number,
            "action context resolved"
        );

        Ok(Some(Self {
            event,
            repo,
            provider: ProviderConfig { base_api, token },
            target,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChangeCollectorError;
    use std::collections::HashMap;

    const PR_PAYLOAD: &str = r#"{
        "action": "synchronize",
        "number": 5,
        "pull_request": {
            "number": 5,
            "base": { "ref": "main", "sha": "aaa111" },
            "head": { "ref": "feature", "sha": "bbb222" }
        }
    }"#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    fn payload_reader(payload: &'static str) -> impl Fn(&str) -> std::io::Result<String> {
        move |path: &str| {
            assert_eq!(path, "/tmp/event.json");
            Ok(payload.to_string())
        }
    }

    fn base_env(event: &str) -> Vec<(&str, &str)> {
        vec![
            ("GITHUB_EVENT_NAME", event),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("GITHUB_REPOSITORY", "octo/hello"),
            ("INPUT_GITHUB-TOKEN", "input-token"),
            ("GITHUB_TOKEN", "env-token"),
        ]
    }

    #[test]
    fn pull_request_context() {
        let ctx = ActionContext::from_lookup(env(&base_env("pull_request")), payload_reader(PR_PAYLOAD))
            .unwrap()
            .unwrap();

        assert_eq!(ctx.event, EventKind::PullRequest);
        assert_eq!(ctx.repo.to_string(), "octo/hello");
        assert_eq!(ctx.provider.token, "input-token");
        assert_eq!(ctx.provider.base_api, DEFAULT_GITHUB_API);
        assert_eq!(
            ctx.target,
            CompareTarget {
                base: "aaa111".into(),
                head: "bbb222".into(),
                pr_number: Some(5),
            }
        );
    }

    #[test]
    fn push_context_has_no_comment_target() {
        let payload = r#"{ "before": "c0ffee", "after": "decaf0", "ref": "refs/heads/main" }"#;
        let mut vars = base_env("push");
        vars.push(("GITHUB_API_URL", "https://ghe.local/api/v3"));

        let ctx = ActionContext::from_lookup(env(&vars), payload_reader(payload))
            .unwrap()
            .unwrap();
        assert_eq!(ctx.event, EventKind::Push);
        assert_eq!(ctx.target.base, "c0ffee");
        assert_eq!(ctx.target.head, "decaf0");
        assert_eq!(ctx.target.pr_number, None);
        assert_eq!(ctx.provider.base_api, "https://ghe.local/api/v3");
    }

    #[test]
    fn branch_creation_push_is_skipped() {
        let payload = r#"{ "before": "0000000000000000000000000000000000000000", "after": "decaf0" }"#;
        let ctx = ActionContext::from_lookup(env(&base_env("push")), payload_reader(payload)).unwrap();
        assert!(ctx.is_none());
    }

    #[test]
    fn other_events_are_skipped_without_reading_payload() {
        let ctx = ActionContext::from_lookup(env(&base_env("workflow_dispatch")), |_: &str| {
            panic!("payload must not be read")
        })
        .unwrap();
        assert!(ctx.is_none());
    }

    #[test]
    fn missing_shas_fail() {
        let payload = r#"{ "pull_request": { "number": 1, "base": { "sha": "" }, "head": { "sha": "x" } } }"#;
        let err = ActionContext::from_lookup(env(&base_env("pull_request")), payload_reader(payload)).unwrap_err();
        assert!(matches!(
            err,
            ChangeCollectorError::Event(EventError::MissingRefs { event: "pull_request" })
        ));

        let err = CompareTarget::from_payload(EventKind::Push, r#"{ "after": "x" }"#).unwrap_err();
        assert!(matches!(err, EventError::MissingRefs { event: "push" }));
    }

    #[test]
    fn token_falls_back_to_github_token() {
        let vars = vec![
            ("GITHUB_EVENT_NAME", "pull_request"),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("GITHUB_REPOSITORY", "octo/hello"),
            ("INPUT_GITHUB-TOKEN", ""),
            ("GITHUB_TOKEN", "env-token"),
        ];
        let ctx = ActionContext::from_lookup(env(&vars), payload_reader(PR_PAYLOAD))
            .unwrap()
            .unwrap();
        assert_eq!(ctx.provider.token, "env-token");
    }

    #[test]
    fn missing_token_and_bad_repository_are_config_errors() {
        let vars = vec![
            ("GITHUB_EVENT_NAME", "pull_request"),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("GITHUB_REPOSITORY", "octo/hello"),
        ];
        let err = ActionContext::from_lookup(env(&vars), payload_reader(PR_PAYLOAD)).unwrap_err();
        assert!(matches!(err, ChangeCollectorError::Config(ConfigError::MissingToken)));

        let vars = vec![
            ("GITHUB_EVENT_NAME", "pull_request"),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("GITHUB_REPOSITORY", "octo"),
            ("GITHUB_TOKEN", "t"),
        ];
        let err = ActionContext::from_lookup(env(&vars), payload_reader(PR_PAYLOAD)).unwrap_err();
        assert!(matches!(
            err,
            ChangeCollectorError::Config(ConfigError::InvalidRepository(_))
        ));
    }

    #[test]
    fn unreadable_payload_is_an_event_error() {
        let err = ActionContext::from_lookup(env(&base_env("push")), |_: &str| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
        })
        .unwrap_err();
        assert!(matches!(err, ChangeCollectorError::Event(EventError::Io { .. })));
    }
}
