//! Text and code preview payloads

use serde::Serialize;

use super::ansi::AnsiSpan;

/// Basic counts over a piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    /// Number of `\n`-separated segments
    pub line_count: usize,
    /// Unicode scalar values
    pub char_count: usize,
    /// Whitespace-separated tokens
    pub word_count: usize,
}

impl TextStats {
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            line_count: text.split('\n').count(),
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetadata {
    pub line_count: usize,
    pub char_count: usize,
    pub word_count: usize,
    pub has_ansi_codes: bool,
}

/// Plain text preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPreview {
    /// The text, escape sequences removed
    pub preview: String,
    pub has_ansi_codes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansi_decorations: Option<Vec<AnsiSpan>>,
    pub metadata: TextMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMetadata {
    pub line_count: usize,
    pub char_count: usize,
    pub language: String,
    pub has_ansi_codes: bool,
}

/// Highlighted source code preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodePreview {
    /// The source, escape sequences removed
    pub preview: String,
    /// Class-based HTML markup
    pub highlighted: String,
    pub language: String,
    pub has_ansi_codes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansi_decorations: Option<Vec<AnsiSpan>>,
    pub metadata: CodeMetadata,
}
