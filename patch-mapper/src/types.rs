//! Output records of the mapper.

use serde::{Deserialize, Serialize};

/// One retained (non-deleted) line of a diff, positioned in the new file.
///
/// Serialises as `{ "modified", "lineContent", "lineNumber" }`, which is the
/// shape the analysis service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    /// `true` for added lines, `false` for unchanged context.
    pub modified: bool,
    /// Raw line text including its leading `+` / ` ` marker.
    pub line_content: String,
    /// Line number in the new file version, seeded from the hunk header.
    pub line_number: u32,
}

impl LineRecord {
    pub fn added(line_content: impl Into<String>, line_number: u32) -> Self {
        Self {
            modified: true,
            line_content: line_content.into(),
            line_number,
        }
    }

    pub fn context(line_content: impl Into<String>, line_number: u32) -> Self {
        Self {
            modified: false,
            line_content: line_content.into(),
            line_number,
        }
    }
}
