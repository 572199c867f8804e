//! Unified-diff to line-list reduction.
//!
//! Takes the `patch` text of a single changed file (as returned by a
//! hosting API's compare endpoint) and produces the ordered list of lines
//! that exist in the new file version, each tagged with its line number and
//! whether it was added or left unchanged.
//!
//! ```
//! use patch_mapper::{LineRecord, map_patch};
//!
//! let records = map_patch("@@ -1,2 +1,2 @@\n foo\n-bar\n+baz").unwrap();
//! assert_eq!(
//!     records,
//!     vec![LineRecord::context(" foo", 1), LineRecord::added("+baz", 2)]
//! );
//! ```

mod errors;
mod mapper;
mod parser;
mod types;

pub use errors::{PatchMapError, PatchMapResult};
pub use mapper::{LineCursor, map_patch};
pub use parser::{HunkHeader, PatchLine, PhysicalLines, physical_lines};
pub use types::LineRecord;
