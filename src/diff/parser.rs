//! Line-oriented unified diff parser

use std::sync::LazyLock;

use regex::Regex;

use super::types::{DiffFile, DiffHunk, DiffLine, DiffLineKind};

const GIT_HEADER: &str = "diff --git ";
const INDEX_HEADER: &str = "Index: ";
const OLD_HEADER: &str = "--- ";
const NEW_HEADER: &str = "+++ ";
const DEV_NULL: &str = "/dev/null";

/// Lines examined after a file header when recovering its paths
const LOOKAHEAD: usize = 10;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@ ?(.*)$")
        .expect("Invalid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekFileHeader,
    AfterFileHeader,
    InHunk,
}

struct HunkStart {
    old_start: usize,
    old_len: usize,
    new_start: usize,
    new_len: usize,
    section: Option<String>,
}

fn parse_hunk_header(line: &str) -> Option<HunkStart> {
    let caps = HUNK_HEADER.captures(line)?;
    let number = |i: usize, default: usize| {
        caps.get(i)
            .map_or(Some(default), |m| m.as_str().parse().ok())
    };
    Some(HunkStart {
        old_start: number(1, 0)?,
        old_len: number(2, 1)?,
        new_start: number(3, 0)?,
        new_len: number(4, 1)?,
        section: caps
            .get(5)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}

/// Path named by a `--- ` / `+++ ` header, without `a/`/`b/` prefix or timestamp
fn header_path(rest: &str) -> String {
    let path = rest.split('\t').next().unwrap_or_default().trim();
    strip_side_prefix(path).to_string()
}

fn strip_side_prefix(path: &str) -> &str {
    if path == DEV_NULL {
        return path;
    }
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
}

/// From/to paths named directly on a `diff --git a/x b/y` line
fn git_header_paths(rest: &str) -> (String, String) {
    match rest.find(" b/") {
        Some(split) => (
            strip_side_prefix(&rest[..split]).to_string(),
            strip_side_prefix(&rest[split + 1..]).to_string(),
        ),
        None => {
            let mut parts = rest.split_whitespace();
            let from = parts.next().map(strip_side_prefix).unwrap_or_default();
            let to = parts.next().map(strip_side_prefix).unwrap_or(from);
            (from.to_string(), to.to_string())
        }
    }
}

fn is_named(path: &str) -> bool {
    !path.is_empty() && path != DEV_NULL
}

fn is_file_boundary(line: &str) -> bool {
    line.starts_with(GIT_HEADER) || line.starts_with(INDEX_HEADER)
}

struct DiffParser<'a> {
    lines: Vec<&'a str>,
    files: Vec<DiffFile>,
    state: State,
    old_cursor: usize,
    new_cursor: usize,
    old_remaining: usize,
    new_remaining: usize,
}

impl<'a> DiffParser<'a> {
    fn new(text: &'a str) -> Self {
        let mut lines: Vec<&str> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        if text.ends_with('\n') {
            lines.pop();
        }
        Self {
            lines,
            files: Vec::new(),
            state: State::SeekFileHeader,
            old_cursor: 0,
            new_cursor: 0,
            old_remaining: 0,
            new_remaining: 0,
        }
    }

    fn run(mut self) -> Vec<DiffFile> {
        for index in 0..self.lines.len() {
            self.step(index);
        }
        self.files
    }

    fn step(&mut self, index: usize) {
        let line = self.lines[index];

        if is_file_boundary(line) {
            self.open_file(index);
            return;
        }
        if let Some(start) = parse_hunk_header(line) {
            self.open_hunk(line, start);
            return;
        }

        match self.state {
            State::InHunk if !line.starts_with(OLD_HEADER) || !self.hunk_exhausted() => {
                self.push_hunk_line(line);
            }
            State::InHunk | State::SeekFileHeader => {
                if line.starts_with(OLD_HEADER) {
                    self.open_file(index);
                }
            }
            State::AfterFileHeader => {
                if let Some(rest) = line.strip_prefix(OLD_HEADER) {
                    let repeats_current = self
                        .files
                        .last()
                        .is_some_and(|f| f.hunks.is_empty() && f.has_path(&header_path(rest)));
                    if !repeats_current {
                        self.open_file(index);
                        return;
                    }
                }
                if let Some(file) = self.files.last_mut() {
                    file.preamble_lines.push(line.to_string());
                }
            }
        }
    }

    fn hunk_exhausted(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    fn open_file(&mut self, index: usize) {
        let line = self.lines[index];
        let (mut from, mut to) = if let Some(rest) = line.strip_prefix(GIT_HEADER) {
            git_header_paths(rest)
        } else if let Some(rest) = line.strip_prefix(INDEX_HEADER) {
            let path = rest.trim().to_string();
            (path.clone(), path)
        } else if let Some(rest) = line.strip_prefix(OLD_HEADER) {
            (header_path(rest), String::new())
        } else {
            (String::new(), String::new())
        };

        let mut seen_old = line.starts_with(OLD_HEADER);
        let end = (index + 1 + LOOKAHEAD).min(self.lines.len());
        for next in &self.lines[index + 1..end] {
            if next.starts_with("@@") || is_file_boundary(next) {
                break;
            }
            if let Some(rest) = next.strip_prefix(OLD_HEADER) {
                if seen_old {
                    break;
                }
                seen_old = true;
                from = header_path(rest);
            } else if let Some(rest) = next.strip_prefix(NEW_HEADER) {
                to = header_path(rest);
                break;
            }
        }

        let display_name = if is_named(&to) {
            to.clone()
        } else if is_named(&from) {
            from.clone()
        } else {
            format!("file-{}", self.files.len() + 1)
        };

        self.files.push(DiffFile {
            display_name,
            from_path: from,
            to_path: to,
            hunks: Vec::new(),
            preamble_lines: Vec::new(),
        });
        self.state = State::AfterFileHeader;
    }

    fn open_hunk(&mut self, line: &str, start: HunkStart) {
        if self.files.is_empty() {
            self.files.push(DiffFile {
                display_name: "unknown".to_string(),
                from_path: String::new(),
                to_path: String::new(),
                hunks: Vec::new(),
                preamble_lines: Vec::new(),
            });
        }
        self.old_cursor = start.old_start;
        self.new_cursor = start.new_start;
        self.old_remaining = start.old_len;
        self.new_remaining = start.new_len;

        if let Some(file) = self.files.last_mut() {
            file.hunks.push(DiffHunk {
                old_start: start.old_start,
                old_line_count: start.old_len,
                new_start: start.new_start,
                new_line_count: start.new_len,
                header: line.to_string(),
                section: start.section,
                lines: Vec::new(),
            });
        }
        self.state = State::InHunk;
    }

    fn push_hunk_line(&mut self, line: &str) {
        let kind = DiffLineKind::classify(line);
        let old_line_number = kind.counts_old().then_some(self.old_cursor);
        let new_line_number = kind.counts_new().then_some(self.new_cursor);
        if kind.counts_old() {
            self.old_cursor = self.old_cursor.saturating_add(1);
            self.old_remaining = self.old_remaining.saturating_sub(1);
        }
        if kind.counts_new() {
            self.new_cursor = self.new_cursor.saturating_add(1);
            self.new_remaining = self.new_remaining.saturating_sub(1);
        }

        if let Some(hunk) = self.files.last_mut().and_then(|f| f.hunks.last_mut()) {
            hunk.lines.push(DiffLine {
                raw_content: line.to_string(),
                kind,
                old_line_number,
                new_line_number,
            });
        }
    }
}

/// Parse unified diff text into files, hunks and lines
///
/// Never fails: malformed input yields a best-effort partial structure.
///
/// # Examples
/// ```
/// # use relic_preview::diff::parse_diff;
/// let files = parse_diff("--- a/x\n+++ b/x\n@@ -1 +1 @@\n-old\n+new\n");
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].display_name, "x");
/// assert_eq!(files[0].hunks[0].lines.len(), 2);
/// ```
#[must_use]
pub fn parse_diff(text: &str) -> Vec<DiffFile> {
    let files = DiffParser::new(text).run();
    tracing::debug!(files = files.len(), "parsed diff");
    files
}

/// Cheap check whether text reads as a unified diff
///
/// Looks at a bounded prefix for a git file header, an svn `Index:` header
/// followed by a separator, or a `---`/`+++` pair together with a hunk header.
#[must_use]
pub fn looks_like_diff(text: &str) -> bool {
    const SCAN_LINES: usize = 500;

    let lines: Vec<&str> = text.lines().take(SCAN_LINES).collect();
    if lines.iter().any(|l| l.starts_with(GIT_HEADER)) {
        return true;
    }
    let has_svn_header = lines
        .windows(2)
        .any(|w| w[0].starts_with(INDEX_HEADER) && w[1].starts_with("===="));
    let has_header_pair = lines
        .windows(2)
        .any(|w| w[0].starts_with(OLD_HEADER) && w[1].starts_with(NEW_HEADER));
    let has_hunk = lines.iter().any(|l| HUNK_HEADER.is_match(l));

    has_svn_header || (has_header_pair && has_hunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TWO_FILE_DIFF;

    fn kinds(hunk: &DiffHunk) -> Vec<DiffLineKind> {
        hunk.lines.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_two_file_git_diff() {
        let files = parse_diff(TWO_FILE_DIFF);
        assert_eq!(files.len(), 2);

        let lib = &files[0];
        assert_eq!(lib.display_name, "src/lib.rs");
        assert_eq!(lib.from_path, "src/lib.rs");
        assert_eq!(lib.hunks.len(), 1);
        assert_eq!(
            lib.preamble_lines,
            vec!["index 3b18e51..a9c1f2d 100644", "--- a/src/lib.rs", "+++ b/src/lib.rs"]
        );
        assert_eq!(
            kinds(&lib.hunks[0]),
            vec![
                DiffLineKind::Context,
                DiffLineKind::Delete,
                DiffLineKind::Add,
                DiffLineKind::Add,
                DiffLineKind::Context,
                DiffLineKind::Context,
            ]
        );
        assert_eq!(lib.additions(), 2);
        assert_eq!(lib.deletions(), 1);

        let readme = &files[1];
        assert_eq!(readme.display_name, "README.md");
        assert_eq!(readme.hunks[0].section.as_deref(), Some("Usage"));
        assert_eq!(readme.hunks[0].old_start, 10);
    }

    #[test]
    fn test_hunk_counts_match_header() {
        for file in parse_diff(TWO_FILE_DIFF) {
            for hunk in &file.hunks {
                let old = hunk.lines.iter().filter(|l| l.kind.counts_old()).count();
                let new = hunk.lines.iter().filter(|l| l.kind.counts_new()).count();
                assert_eq!(old, hunk.old_line_count);
                assert_eq!(new, hunk.new_line_count);
            }
        }
    }

    #[test]
    fn test_line_numbers_follow_cursors() {
        let files = parse_diff(TWO_FILE_DIFF);
        let lines = &files[0].hunks[0].lines;

        assert_eq!((lines[0].old_line_number, lines[0].new_line_number), (Some(1), Some(1)));
        assert_eq!((lines[1].old_line_number, lines[1].new_line_number), (Some(2), None));
        assert_eq!((lines[2].old_line_number, lines[2].new_line_number), (None, Some(2)));
        assert_eq!((lines[3].old_line_number, lines[3].new_line_number), (None, Some(3)));
        assert_eq!((lines[4].old_line_number, lines[4].new_line_number), (Some(3), Some(4)));
        assert_eq!((lines[5].old_line_number, lines[5].new_line_number), (Some(4), Some(5)));
    }

    #[test]
    fn test_missing_lengths_default_to_one() {
        let files = parse_diff("--- a/x\n+++ b/x\n@@ -3 +3 @@\n-old\n+new\n");
        let hunk = &files[0].hunks[0];
        assert_eq!((hunk.old_start, hunk.old_line_count), (3, 1));
        assert_eq!((hunk.new_start, hunk.new_line_count), (3, 1));
        assert_eq!(hunk.section, None);
    }

    #[test]
    fn test_orphan_hunk_gets_placeholder_file() {
        let files = parse_diff("@@ -1,2 +1,2 @@\n a\n-b\n+c\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].display_name, "unknown");
        assert_eq!(files[0].hunks[0].lines.len(), 3);
    }

    #[test]
    fn test_deleted_line_looking_like_header_stays_in_hunk() {
        let text = "--- a/notes.md\n+++ b/notes.md\n@@ -1,2 +1,1 @@\n--- a horizontal rule\n kept\n";
        let files = parse_diff(text);
        assert_eq!(files.len(), 1);
        let hunk = &files[0].hunks[0];
        assert_eq!(kinds(hunk), vec![DiffLineKind::Delete, DiffLineKind::Context]);
        assert_eq!(hunk.lines[0].content(), "-- a horizontal rule");
    }

    #[test]
    fn test_plain_headers_after_exhausted_hunk_open_new_file() {
        let text = "\
--- a/one.txt
+++ b/one.txt
@@ -1 +1 @@
-1
+one
--- a/two.txt
+++ b/two.txt
@@ -1 +1 @@
-2
+two
";
        let files = parse_diff(text);
        let names: Vec<&str> = files.iter().map(|f| f.display_name.as_str()).collect();
        assert_eq!(names, vec!["one.txt", "two.txt"]);
        assert_eq!(files[1].preamble_lines, vec!["+++ b/two.txt"]);
    }

    #[test]
    fn test_new_file_uses_to_path_and_deleted_file_uses_from() {
        let text = "\
diff --git a/new.rs b/new.rs
new file mode 100644
--- /dev/null
+++ b/new.rs
@@ -0,0 +1 @@
+fn main() {}
diff --git a/old.rs b/old.rs
deleted file mode 100644
--- a/old.rs
+++ /dev/null
@@ -1 +0,0 @@
-fn main() {}
";
        let files = parse_diff(text);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].display_name, "new.rs");
        assert_eq!(files[0].from_path, DEV_NULL);
        assert_eq!(files[1].display_name, "old.rs");
        assert_eq!(files[1].to_path, DEV_NULL);
    }

    #[test]
    fn test_rename_preamble_without_hunks() {
        let text = "\
diff --git a/old name.txt b/new name.txt
similarity index 100%
rename from old name.txt
rename to new name.txt
";
        let files = parse_diff(text);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].from_path, "old name.txt");
        assert_eq!(files[0].to_path, "new name.txt");
        assert_eq!(files[0].preamble_lines.len(), 3);
        assert!(files[0].hunks.is_empty());
    }

    #[test]
    fn test_svn_index_header_with_timestamps() {
        let text = "\
Index: trunk/main.c
===================================================================
--- trunk/main.c\t(revision 41)
+++ trunk/main.c\t(working copy)
@@ -1,1 +1,1 @@
-int x;
+int y;
";
        let files = parse_diff(text);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].display_name, "trunk/main.c");
        assert_eq!(files[0].preamble_lines.len(), 3);
    }

    #[test]
    fn test_no_newline_marker_is_meta() {
        let files = parse_diff("--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n\\ No newline at end of file\n+b\n");
        let meta = &files[0].hunks[0].lines[1];
        assert_eq!(meta.kind, DiffLineKind::Meta);
        assert_eq!(meta.old_line_number, None);
        assert_eq!(meta.new_line_number, None);
    }

    #[test]
    fn test_crlf_and_synthesized_name() {
        let files = parse_diff("--- \r\n+++ \r\n@@ -1 +1 @@\r\n-a\r\n+b\r\n");
        assert_eq!(files[0].display_name, "file-1");
        assert_eq!(files[0].hunks[0].lines[0].raw_content, "-a");
    }

    #[test]
    fn test_cursors_saturate_at_huge_starts() {
        let text = format!("@@ -{max},2 +{max},2 @@\n a\n b\n", max = usize::MAX);
        let files = parse_diff(&text);
        let lines = &files[0].hunks[0].lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].old_line_number, Some(usize::MAX));
        assert_eq!(lines[1].old_line_number, Some(usize::MAX));
        assert_eq!(lines[1].new_line_number, Some(usize::MAX));
    }

    #[test]
    fn test_malformed_hunk_headers() {
        // (input, files, hunks in the first file, preamble lines in the first file)
        let cases: &[(&str, usize, usize, usize)] = &[
            ("@@ -18446744073709551615,2 +1,2 @@\n a\n b\n", 1, 1, 0),
            ("@@ -99999999999999999999999 +1 @@\n a\n", 0, 0, 0),
            ("@@ -1,2 @@\n a\n b\n", 0, 0, 0),
            ("--- a/x\n+++ b/x\n@@ -1 +1\n-a\n", 1, 0, 3),
            ("--- a/x\n+++ b/x\n@@\n-a\n", 1, 0, 3),
            ("\\ No newline at end of file\n", 0, 0, 0),
            ("--- a/x\n+++ b/x\n\\ No newline at end of file\n", 1, 0, 2),
        ];
        for (input, files, hunks, preamble) in cases {
            let parsed = parse_diff(input);
            assert_eq!(parsed.len(), *files, "{input:?}");
            if let Some(first) = parsed.first() {
                assert_eq!(first.hunks.len(), *hunks, "{input:?}");
                assert_eq!(first.preamble_lines.len(), *preamble, "{input:?}");
            }
        }
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(parse_diff("just some prose\nwith two lines\n").is_empty());
        assert!(parse_diff("").is_empty());
    }

    #[test]
    fn test_looks_like_diff() {
        assert!(looks_like_diff(TWO_FILE_DIFF));
        assert!(looks_like_diff("--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b\n"));
        assert!(!looks_like_diff("--- yaml document\n+++ not really\nplain text\n"));
        assert!(!looks_like_diff("Hello world\n"));
    }
}
