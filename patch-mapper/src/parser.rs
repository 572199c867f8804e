//! Line splitting and tokenisation of unified-diff hunk text.
//!
//! The grammar is deliberately small. Every physical line is exactly one of:
//!
//! ```text
//! header   := "@@" ranges "@@" [section]     ranges contains "+<new_start>,"
//! added    := "+" text
//! removed  := "-" text
//! marker   := "\" text                        ("\ No newline at end of file")
//! context  := anything else                   (normally " " text, or empty)
//! ```

use crate::errors::{PatchMapError, PatchMapResult};

/// Marker that opens and closes the range block of a hunk header.
const HUNK_MARKER: &str = "@@";

/// Parsed `@@ -a,b +c,d @@` header. Only the new-file start is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    /// First line number of the hunk in the new file version.
    pub new_start: u32,
}

impl HunkHeader {
    /// Parses a header line.
    ///
    /// Takes the text between the first pair of `@@` markers, finds the `+`
    /// and reads the digits up to the next `,`. Returns `None` when any of
    /// those pieces is missing or the digits do not fit into `u32`.
    pub fn parse(line: &str) -> Option<Self> {
        let after_open = line.strip_prefix(HUNK_MARKER)?;
        let close = after_open.find(HUNK_MARKER)?;
        let ranges = &after_open[..close];

        let plus = ranges.find('+')?;
        let after_plus = &ranges[plus + 1..];
        let comma = after_plus.find(',')?;
        let digits = &after_plus[..comma];

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let new_start = digits.parse::<u32>().ok()?;
        Some(Self { new_start })
    }
}

/// One classified physical line of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchLine<'a> {
    HunkHeader(HunkHeader),
    /// Raw line, marker included.
    Added(&'a str),
    Removed(&'a str),
    /// Raw line, marker included (may be empty).
    Context(&'a str),
    /// `\ No newline at end of file`; not a line of either file.
    NoNewlineMarker,
}

impl<'a> PatchLine<'a> {
    /// Classifies a physical line. `line_index` is only used for error context.
    pub fn classify(line_index: usize, line: &'a str) -> PatchMapResult<Self> {
        if line.starts_with(HUNK_MARKER) {
            return HunkHeader::parse(line).map(PatchLine::HunkHeader).ok_or_else(|| {
                PatchMapError::MalformedHunkHeader {
                    line_index,
                    header: line.to_string(),
                }
            });
        }

        let token = match line.as_bytes().first() {
            Some(b'+') => PatchLine::Added(line),
            Some(b'-') => PatchLine::Removed(line),
            Some(b'\\') => PatchLine::NoNewlineMarker,
            _ => PatchLine::Context(line),
        };
        Ok(token)
    }
}

/// Iterator over the physical lines of a text, accepting `\r\n`, `\r` and
/// `\n` in any mix.
///
/// A single terminating line break does not yield a trailing empty line, so
/// an empty text yields nothing.
#[derive(Debug, Clone)]
pub struct PhysicalLines<'a> {
    rest: Option<&'a str>,
}

/// Splits `text` into physical lines. See [`PhysicalLines`].
pub fn physical_lines(text: &str) -> PhysicalLines<'_> {
    PhysicalLines {
        rest: (!text.is_empty()).then_some(text),
    }
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match rest.find(['\r', '\n']) {
            Some(idx) => {
                let line = &rest[..idx];
                let break_len = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                let tail = &rest[idx + break_len..];
                self.rest = (!tail.is_empty()).then_some(tail);
                Some(line)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}
