//! Turns the changed files of a comparison into the analysis payload.
//!
//! Each file keeps its descriptor; its raw patch is replaced by the ordered
//! line records produced by [`patch_mapper::map_patch`]. Files without a
//! textual diff (binary files, pure renames, oversized diffs the provider
//! omitted) get an empty list and are never handed to the mapper.

use patch_mapper::map_patch;
use tracing::{debug, info};

use crate::errors::{ChangeCollectorError, ChangeCollectorResult};
use crate::git_providers::types::{ChangedFile, CollectedFile};

/// Counters for one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub files: usize,
    /// Files whose patch went through the mapper.
    pub mapped: usize,
    /// Files left with an empty list (no textual diff).
    pub skipped: usize,
    /// Added lines across all files.
    pub modified_lines: usize,
}

/// Heuristic to detect whether a unified diff text represents a binary patch.
///
/// This checks for common markers like `GIT binary patch`, `Binary files differ`
/// and the presence of NUL bytes.
pub fn looks_like_binary_patch(diff: &str) -> bool {
    if diff.contains("GIT binary patch") {
        return true;
    }
    if diff.starts_with("Binary files") && diff.contains(" differ") {
        return true;
    }
    diff.bytes().any(|b| b == 0)
}

/// Returns the patch text if the file carries a textual diff.
fn textual_patch(file: &ChangedFile) -> Option<&str> {
    file.patch
        .as_deref()
        .filter(|p| !p.trim().is_empty() && !looks_like_binary_patch(p))
}

/// Maps one file.
///
/// # Errors
/// [`ChangeCollectorError::Patch`] naming the file if its patch is malformed.
pub fn collect_file(file: ChangedFile) -> ChangeCollectorResult<CollectedFile> {
    let patch = match textual_patch(&file) {
        Some(text) => map_patch(text).map_err(|source| ChangeCollectorError::Patch {
            file: file.filename.clone(),
            source,
        })?,
        None => Vec::new(),
    };

    let ChangedFile {
        filename,
        status,
        previous_filename,
        extra,
        ..
    } = file;

    Ok(CollectedFile {
        filename,
        status,
        previous_filename,
        extra,
        patch,
    })
}

/// Maps every file in order, one at a time.
///
/// Stops at the first malformed patch.
pub fn collect_changes(files: Vec<ChangedFile>) -> ChangeCollectorResult<(Vec<CollectedFile>, CollectStats)> {
    let mut stats = CollectStats {
        files: files.len(),
        ..CollectStats::default()
    };
    let mut out = Vec::with_capacity(files.len());

    for file in files {
        let has_text = textual_patch(&file).is_some();
        let collected = collect_file(file)?;

        if has_text {
            stats.mapped += 1;
            stats.modified_lines += collected.patch.iter().filter(|r| r.modified).count();
        } else {
            stats.skipped += 1;
            debug!(file = %collected.filename, status = ?collected.status, "no textual diff");
        }

        out.push(collected);
    }

    info!(
        files = stats.files,
        mapped = stats.mapped,
        skipped = stats.skipped,
        modified_lines = stats.modified_lines,
        "changes collected"
    );

    Ok((out, stats))
}
