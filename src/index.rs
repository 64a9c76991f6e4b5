//! Relic index documents
//!
//! Two dialects are recognised. The structured one is a small YAML-like
//! list:
//!
//! ```text
//! title: Build logs
//! description: Nightly runs
//! relics:
//!   - id: 0123456789abcdef0123456789abcdef
//!     title: Monday
//!     tags: [ci, "nightly"]
//! ```
//!
//! The plain one is just relic ids, one per line, optionally `- ` prefixed.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Content type that marks a relic index explicitly
pub const RELIC_INDEX_MIME: &str = "application/x-relic-index";

const RELICS_MARKER: &str = "relics:";
const ID_MARKER: &str = "- id:";

static HEX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9a-fA-F]{32}\b").expect("Invalid regex"));
static ID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:- )?[0-9a-fA-F]{32}$").expect("Invalid regex"));

/// One entry of an index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelicRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl RelicRef {
    fn set(&mut self, key: &str, value: &str) {
        match key {
            "id" => self.id = unquote(value).to_string(),
            "title" => self.title = Some(unquote(value).to_string()),
            "description" => self.description = Some(unquote(value).to_string()),
            "tags" => self.tags = Some(parse_tags(value)),
            _ => {}
        }
    }
}

/// A parsed index document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelicIndex {
    pub title: String,
    pub description: String,
    pub relics: Vec<RelicRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelicIndexMetadata {
    pub title: String,
    pub description: String,
    pub count: usize,
}

/// Index preview payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelicIndexPreview {
    pub relics: Vec<RelicRef>,
    pub metadata: RelicIndexMetadata,
}

impl From<RelicIndex> for RelicIndexPreview {
    fn from(index: RelicIndex) -> Self {
        Self {
            metadata: RelicIndexMetadata {
                title: index.title,
                description: index.description,
                count: index.relics.len(),
            },
            relics: index.relics,
        }
    }
}

fn is_structured(text: &str) -> bool {
    text.contains(RELICS_MARKER) && text.contains(ID_MARKER)
}

/// Whether `text` (declared as `declared`) is a relic index
///
/// # Examples
/// ```
/// # use relic_preview::index::looks_like_index;
/// assert!(looks_like_index("relics:\n  - id: x\n", None));
/// assert!(looks_like_index("", Some("application/x-relic-index")));
/// assert!(!looks_like_index("hello\nworld\n", None));
/// ```
#[must_use]
pub fn looks_like_index(text: &str, declared: Option<&str>) -> bool {
    if declared.is_some_and(|d| d.trim().to_lowercase().starts_with(RELIC_INDEX_MIME)) {
        return true;
    }
    if is_structured(text) {
        return true;
    }

    let (total, ids) = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .fold((0usize, 0usize), |(total, ids), line| {
            (total + 1, ids + usize::from(ID_LINE.is_match(line)))
        });
    total > 0 && ids * 2 > total
}

/// Parse an index document in either dialect
///
/// Never fails; unrecognised lines are skipped.
#[must_use]
pub fn parse_index(text: &str) -> RelicIndex {
    let index = if text.contains(RELICS_MARKER) {
        parse_structured(text)
    } else {
        parse_plain(text)
    };
    tracing::debug!(relics = index.relics.len(), "parsed relic index");
    index
}

fn parse_structured(text: &str) -> RelicIndex {
    let mut index = RelicIndex::default();
    let mut in_relics = false;
    let mut current: Option<RelicRef> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == RELICS_MARKER {
            in_relics = true;
            continue;
        }

        if !in_relics {
            match split_key(line) {
                Some(("title", value)) => index.title = unquote(value).to_string(),
                Some(("description", value)) => index.description = unquote(value).to_string(),
                _ => {}
            }
            continue;
        }

        if let Some(item) = line.strip_prefix('-') {
            flush(&mut index, current.take());
            let item = item.trim();
            let mut relic = RelicRef::default();
            match split_key(item) {
                Some((key, value)) => relic.set(key, value),
                None => relic.id = unquote(item).to_string(),
            }
            current = Some(relic);
        } else if let (Some(relic), Some((key, value))) = (current.as_mut(), split_key(line)) {
            relic.set(key, value);
        }
    }
    flush(&mut index, current);
    index
}

fn flush(index: &mut RelicIndex, relic: Option<RelicRef>) {
    if let Some(relic) = relic.filter(|r| !r.id.is_empty()) {
        index.relics.push(relic);
    }
}

fn parse_plain(text: &str) -> RelicIndex {
    RelicIndex {
        relics: HEX_ID
            .find_iter(text)
            .map(|m| RelicRef {
                id: m.as_str().to_string(),
                ..RelicRef::default()
            })
            .collect(),
        ..RelicIndex::default()
    }
}

fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_tags(value: &str) -> Vec<String> {
    let value = value.trim();
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);
    inner
        .split(',')
        .map(unquote)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "0123456789abcdef0123456789abcdef";
    const ID_B: &str = "fedcba9876543210fedcba9876543210";

    #[test]
    fn test_ten_id_lines_look_like_index() {
        let text: String = (0..10).map(|i| format!("{i:032x}\n")).collect();
        assert!(looks_like_index(&text, None));
    }

    #[test]
    fn test_prose_does_not_look_like_index() {
        let text = "This is a line of prose.\n".repeat(10);
        assert!(!looks_like_index(&text, None));
        assert!(!looks_like_index("", None));
    }

    #[test]
    fn test_majority_rule() {
        let half = format!("- {ID_A}\nnotes\n");
        assert!(!looks_like_index(&half, None));
        let majority = format!("- {ID_A}\n{ID_B}\nnotes\n");
        assert!(looks_like_index(&majority, None));
    }

    #[test]
    fn test_declared_mime_with_parameters() {
        assert!(looks_like_index("anything", Some("Application/X-Relic-Index; v=1")));
    }

    #[test]
    fn test_structured_header_and_records() {
        let text = format!(
            "# comment\ntitle: \"Build logs\"\ndescription: Nightly runs\nrelics:\n  - id: {ID_A}\n    title: Monday\n    tags: [ci, \"nightly\"]\n  - id: {ID_B}\n    description: 'second'\n"
        );
        let index = parse_index(&text);
        assert_eq!(index.title, "Build logs");
        assert_eq!(index.description, "Nightly runs");
        assert_eq!(index.relics.len(), 2);

        let first = &index.relics[0];
        assert_eq!(first.id, ID_A);
        assert_eq!(first.title.as_deref(), Some("Monday"));
        assert_eq!(first.tags.as_deref(), Some(&["ci".to_string(), "nightly".to_string()][..]));

        let second = &index.relics[1];
        assert_eq!(second.id, ID_B);
        assert_eq!(second.description.as_deref(), Some("second"));
        assert_eq!(second.title, None);
    }

    #[test]
    fn test_title_after_relics_belongs_to_record() {
        let text = format!("relics:\n  - id: {ID_A}\ntitle: Record title\n");
        let index = parse_index(&text);
        assert_eq!(index.title, "");
        assert_eq!(index.relics[0].title.as_deref(), Some("Record title"));
    }

    #[test]
    fn test_plain_dialect_collects_every_id() {
        let text = format!("{ID_A}\n- {ID_B}\nsee also {ID_A}\n");
        let index = parse_index(&text);
        let ids: Vec<&str> = index.relics.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![ID_A, ID_B, ID_A]);
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let index = parse_index("relics:\n  - title: orphan\n");
        assert!(index.relics.is_empty());
    }

    #[test]
    fn test_preview_metadata_counts() {
        let preview = RelicIndexPreview::from(parse_index(&format!("relics:\n  - id: {ID_A}\n")));
        assert_eq!(preview.metadata.count, 1);
        assert_eq!(preview.relics[0].id, ID_A);
    }
}
