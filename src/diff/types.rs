//! Unified diff model

use serde::Serialize;

/// Classification of a line inside a hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineKind {
    Context,
    Add,
    Delete,
    /// `\ No newline at end of file` and similar markers
    Meta,
}

impl DiffLineKind {
    /// Classify a hunk line by its first character
    #[must_use]
    pub fn classify(line: &str) -> Self {
        match line.as_bytes().first() {
            Some(b'+') => Self::Add,
            Some(b'-') => Self::Delete,
            Some(b'\\') => Self::Meta,
            _ => Self::Context,
        }
    }

    #[must_use]
    pub const fn counts_old(self) -> bool {
        matches!(self, Self::Context | Self::Delete)
    }

    #[must_use]
    pub const fn counts_new(self) -> bool {
        matches!(self, Self::Context | Self::Add)
    }
}

/// One line of a hunk
///
/// `old_line_number` is set for context and delete lines, `new_line_number`
/// for context and add lines. Meta lines carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    /// The line as it appeared in the diff, marker included
    pub raw_content: String,
    pub kind: DiffLineKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_line_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line_number: Option<usize>,
}

impl DiffLine {
    /// The line without its leading marker
    #[must_use]
    pub fn content(&self) -> &str {
        match (self.kind, self.raw_content.as_bytes().first()) {
            (DiffLineKind::Meta, _) => &self.raw_content,
            (_, Some(b' ' | b'+' | b'-')) => &self.raw_content[1..],
            _ => &self.raw_content,
        }
    }
}

/// A contiguous change region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_line_count: usize,
    pub new_start: usize,
    pub new_line_count: usize,
    /// The raw `@@ ... @@` line
    pub header: String,
    /// Text after the closing `@@`, usually an enclosing function name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    fn count(&self, kind: DiffLineKind) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}

/// All hunks touching one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffFile {
    /// `to_path`, falling back to `from_path`, then a synthesized `file-N`
    pub display_name: String,
    pub from_path: String,
    pub to_path: String,
    pub hunks: Vec<DiffHunk>,
    /// Header lines between the file header and the first hunk
    pub preamble_lines: Vec<String>,
}

impl DiffFile {
    /// Number of added lines across all hunks
    #[must_use]
    pub fn additions(&self) -> usize {
        self.hunks.iter().map(|h| h.count(DiffLineKind::Add)).sum()
    }

    /// Number of deleted lines across all hunks
    #[must_use]
    pub fn deletions(&self) -> usize {
        self.hunks.iter().map(|h| h.count(DiffLineKind::Delete)).sum()
    }

    /// Whether `path` names this file on either side
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        !path.is_empty() && (self.from_path == path || self.to_path == path)
    }
}
