//! Error type for patch mapping.

use thiserror::Error;

/// Convenient alias for mapper results.
pub type PatchMapResult<T> = Result<T, PatchMapError>;

/// Failures raised while reducing a unified diff to line records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchMapError {
    /// A line starting with `@@` did not carry a `+<digits>,` segment
    /// between its first pair of `@@` markers.
    #[error("malformed hunk header at line {line_index}: {header:?}")]
    MalformedHunkHeader {
        /// Zero-based index of the physical line inside the patch text.
        line_index: usize,
        /// Raw header text as found in the patch.
        header: String,
    },

    /// The new-file line counter would exceed `u32::MAX`.
    #[error("line number overflow at line {line_index}")]
    LineOverflow {
        /// Zero-based index of the physical line inside the patch text.
        line_index: usize,
    },
}
