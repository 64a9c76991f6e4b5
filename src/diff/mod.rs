//! Unified diff parsing
//!
//! Turns `diff -u` / `git diff` / `svn diff` output into a file, hunk and
//! line model with old and new line numbers attached.

mod parser;
mod types;

pub use parser::{looks_like_diff, parse_diff};
pub use types::{DiffFile, DiffHunk, DiffLine, DiffLineKind};
