//! Data model for commit comparisons and changed files.

use patch_mapper::LineRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ConfigError;

/// `owner/repo` pair identifying a repository on the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Splits "owner/repo" into components.
    ///
    /// # Errors
    /// [`ConfigError::InvalidRepository`] if either side is empty or there
    /// are more than two segments.
    pub fn parse(slug: &str) -> Result<Self, ConfigError> {
        let mut parts = slug.trim().split('/');
        let owner = parts.next().unwrap_or("").trim();
        let repo = parts.next().unwrap_or("").trim();

        if owner.is_empty() || repo.is_empty() || parts.next().is_some() {
            return Err(ConfigError::InvalidRepository(slug.to_string()));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Status of a file inside a comparison.
///
/// Round-trips unknown provider values unchanged through [`FileStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    Other(String),
}

impl From<String> for FileStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "added" => FileStatus::Added,
            "removed" => FileStatus::Removed,
            "modified" => FileStatus::Modified,
            "renamed" => FileStatus::Renamed,
            "copied" => FileStatus::Copied,
            "changed" => FileStatus::Changed,
            "unchanged" => FileStatus::Unchanged,
            _ => FileStatus::Other(s),
        }
    }
}

impl From<FileStatus> for String {
    fn from(s: FileStatus) -> Self {
        match s {
            FileStatus::Added => "added".into(),
            FileStatus::Removed => "removed".into(),
            FileStatus::Modified => "modified".into(),
            FileStatus::Renamed => "renamed".into(),
            FileStatus::Copied => "copied".into(),
            FileStatus::Changed => "changed".into(),
            FileStatus::Unchanged => "unchanged".into(),
            FileStatus::Other(s) => s,
        }
    }
}

/// A changed file as returned by the compare endpoint.
///
/// Only the fields the collector reads are typed; everything else the
/// provider sends (`sha`, `additions`, `blob_url`, ...) is kept in `extra`
/// and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
    /// Raw unified diff text. Absent for binary files and large diffs.
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A changed file whose patch has been reduced to line records.
///
/// Serialises with the same keys as [`ChangedFile`], `patch` now being an
/// array of `{ modified, lineContent, lineNumber }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedFile {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub patch: Vec<LineRecord>,
}

/// Relationship between head and base of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    Ahead,
    Behind,
    Diverged,
    Identical,
    #[serde(other)]
    Unknown,
}

/// Result of comparing two commits (subset).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub status: ComparisonStatus,
    #[serde(default)]
    pub ahead_by: u64,
    #[serde(default)]
    pub behind_by: u64,
    #[serde(default)]
    pub total_commits: u64,
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

/// A comment created on an issue or pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedComment {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}
