//! Change collection for the test-impact CI step.
//!
//! - [`ci_context`]: which commits to compare, read from the Actions environment
//! - [`git_providers`]: GitHub compare/comment endpoints
//! - [`collector`]: per-file reduction of patches to line records

pub mod ci_context;
pub mod collector;
mod errors;
pub mod git_providers;


pub use ci_context::{ActionContext, CompareTarget, EventKind};
pub use collector::{CollectStats, collect_changes, collect_file};
pub use errors::{
    ChangeCollectorError, ChangeCollectorResult, ConfigError, EventError, ProviderError,
};
pub use git_providers::github::GitHubClient;
pub use git_providers::types::{
    ChangedFile, CollectedFile, Comparison, ComparisonStatus, FileStatus, RepoRef,
};
