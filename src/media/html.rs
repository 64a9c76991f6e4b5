//! HTML documents, shown as highlighted source

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::highlight::{Cancelled, CodeProcessor, TextStats};

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("Invalid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub line_count: usize,
    pub char_count: usize,
}

/// HTML preview payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPreview {
    pub preview: String,
    pub highlighted: String,
    pub metadata: HtmlMetadata,
}

/// Contents of the first `<title>` element, whitespace collapsed
#[must_use]
pub fn html_title(text: &str) -> Option<String> {
    let raw = TITLE.captures(text)?.get(1)?.as_str();
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

/// Build an HTML preview, highlighting the source as `html`
///
/// # Errors
/// Returns `Cancelled` if the token fires while highlighting.
pub fn process_html(
    processor: &CodeProcessor,
    text: &str,
    cancel: &CancellationToken,
) -> Result<HtmlPreview, Cancelled> {
    let highlighted = processor.highlight_cancellable(text, "html", cancel)?;
    let stats = TextStats::of(text);
    Ok(HtmlPreview {
        preview: text.to_string(),
        highlighted,
        metadata: HtmlMetadata {
            title: html_title(text),
            line_count: stats.line_count,
            char_count: stats.char_count,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_extraction() {
        assert_eq!(
            html_title("<html><HEAD><Title lang=en>\n  Release   notes </title></head>").as_deref(),
            Some("Release notes")
        );
        assert_eq!(html_title("<title></title>"), None);
        assert_eq!(html_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_process_html() {
        let source = "<!doctype html>\n<title>Hi</title>\n<p>x</p>";
        let preview =
            process_html(&CodeProcessor::default(), source, &CancellationToken::new()).unwrap();
        assert_eq!(preview.preview, source);
        assert_eq!(preview.metadata.title.as_deref(), Some("Hi"));
        assert_eq!(preview.metadata.line_count, 3);
        assert!(!preview.highlighted.contains("<p>x</p>"));
    }
}
