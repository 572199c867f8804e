//! Hunk-to-line-list reduction.
//!
//! The walk is a left fold over tokenised lines carrying a [`LineCursor`].
//! A header re-seeds the cursor, additions and context lines advance it and
//! emit a record, deletions and no-newline markers do neither.

use tracing::trace;

use crate::errors::{PatchMapError, PatchMapResult};
use crate::parser::{PatchLine, physical_lines};
use crate::types::LineRecord;

/// Running new-file line counter.
///
/// Starts at `0`. If a patch carries content before any header the first
/// line is tagged `0`; real diffs always open with a header.
///
/// Once `u32::MAX` has been handed out the cursor is exhausted until the
/// next header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineCursor {
    current_line: u32,
    exhausted: bool,
}

impl LineCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line number the next retained line will receive (stays at
    /// `u32::MAX` once exhausted).
    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    /// Applies one token and returns the record it produces, if any.
    pub fn step(&mut self, line_index: usize, line: PatchLine<'_>) -> PatchMapResult<Option<LineRecord>> {
        match line {
            PatchLine::HunkHeader(header) => {
                trace!(line_index, new_start = header.new_start, "hunk header");
                self.current_line = header.new_start;
                self.exhausted = false;
                Ok(None)
            }
            PatchLine::Added(raw) => self.advance(line_index).map(|n| Some(LineRecord::added(raw, n))),
            PatchLine::Context(raw) => self.advance(line_index).map(|n| Some(LineRecord::context(raw, n))),
            PatchLine::Removed(_) | PatchLine::NoNewlineMarker => Ok(None),
        }
    }

    fn advance(&mut self, line_index: usize) -> PatchMapResult<u32> {
        if self.exhausted {
            return Err(PatchMapError::LineOverflow { line_index });
        }
        let number = self.current_line;
        match number.checked_add(1) {
            Some(next) => self.current_line = next,
            None => self.exhausted = true,
        }
        Ok(number)
    }
}

/// Reduces one file's unified-diff text to its ordered line records.
///
/// Deleted lines are dropped and never consume a line number. Line numbers
/// restart at every hunk header, so they may jump in either direction
/// between hunks.
///
/// # Errors
/// - [`PatchMapError::MalformedHunkHeader`] when a `@@` line lacks the
///   `+<digits>,` segment.
/// - [`PatchMapError::LineOverflow`] when a retained line would need a
///   number past `u32::MAX`.
pub fn map_patch(patch: &str) -> PatchMapResult<Vec<LineRecord>> {
    let (_, records) = physical_lines(patch).enumerate().try_fold(
        (LineCursor::new(), Vec::new()),
        |(mut cursor, mut records), (line_index, raw)| {
            let token = PatchLine::classify(line_index, raw)?;
            if let Some(record) = cursor.step(line_index, token)? {
                records.push(record);
            }
            Ok::<_, PatchMapError>((cursor, records))
        },
    )?;

    Ok(records)
}
