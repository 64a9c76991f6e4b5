//! Preview content types

use serde::Serialize;

use crate::archive::ArchiveResult;
use crate::diff::DiffFile;
use crate::highlight::{CodePreview, TextPreview};
use crate::index::RelicIndexPreview;
use crate::media::{CsvPreview, ExcalidrawPreview, HtmlPreview, ImagePreview, PdfPreview};

/// Input of a classification call
///
/// Only `bytes` is trusted; the declared type and hint are advisory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDescriptor<'a> {
    pub bytes: &'a [u8],
    pub declared_content_type: Option<&'a str>,
    pub language_hint: Option<&'a str>,
    /// Password for encrypted PDFs
    pub password: Option<&'a str>,
}

impl<'a> ContentDescriptor<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            declared_content_type: None,
            language_hint: None,
            password: None,
        }
    }

    #[must_use]
    pub const fn with_content_type(mut self, content_type: Option<&'a str>) -> Self {
        self.declared_content_type = content_type;
        self
    }

    #[must_use]
    pub const fn with_language_hint(mut self, hint: Option<&'a str>) -> Self {
        self.language_hint = hint;
        self
    }

    #[must_use]
    pub const fn with_password(mut self, password: Option<&'a str>) -> Self {
        self.password = password;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffMetadata {
    pub line_count: usize,
    pub char_count: usize,
    /// Always `diff`
    pub language: String,
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
}

/// Parsed unified diff with its highlighted source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPreview {
    pub preview: String,
    pub highlighted: String,
    pub files: Vec<DiffFile>,
    pub metadata: DiffMetadata,
}

/// The result of classifying one relic
///
/// Serialised with a lowercase `type` tag next to the payload fields.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProcessedPreview {
    Text(TextPreview),
    Code(CodePreview),
    Html(HtmlPreview),
    Csv(CsvPreview),
    Image(ImagePreview),
    Pdf(PdfPreview),
    Archive(ArchiveResult),
    Excalidraw(ExcalidrawPreview),
    Diff(DiffPreview),
    #[serde(rename = "relicindex")]
    RelicIndex(RelicIndexPreview),
}

impl ProcessedPreview {
    /// The serialised `type` tag
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Code(_) => "code",
            Self::Html(_) => "html",
            Self::Csv(_) => "csv",
            Self::Image(_) => "image",
            Self::Pdf(_) => "pdf",
            Self::Archive(_) => "archive",
            Self::Excalidraw(_) => "excalidraw",
            Self::Diff(_) => "diff",
            Self::RelicIndex(_) => "relicindex",
        }
    }

    /// Serialise to a JSON value
    ///
    /// # Errors
    /// Returns the serializer error; every payload is plain data so this is
    /// not expected in practice.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl std::fmt::Display for ProcessedPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(p) => write!(
                f,
                "text: {} lines, {} words",
                p.metadata.line_count, p.metadata.word_count
            ),
            Self::Code(p) => write!(f, "code ({}): {} lines", p.language, p.metadata.line_count),
            Self::Html(p) => match &p.metadata.title {
                Some(title) => write!(f, "html: {title}"),
                None => write!(f, "html: {} lines", p.metadata.line_count),
            },
            Self::Csv(p) => write!(
                f,
                "csv: {} rows x {} columns",
                p.metadata.row_count, p.metadata.column_count
            ),
            Self::Image(p) => match (p.metadata.width, p.metadata.height) {
                (Some(w), Some(h)) => write!(f, "image ({}): {w} x {h}", p.mime),
                _ => write!(f, "image ({}): {}", p.mime, p.metadata.size_formatted),
            },
            Self::Pdf(p) => match &p.metadata {
                Some(m) => write!(f, "pdf: {} pages", m.num_pages),
                None => write!(f, "pdf: password required"),
            },
            Self::Archive(a) => write!(
                f,
                "archive ({}): {} files, {} directories, {}",
                a.archive_type,
                a.summary.total_files,
                a.summary.total_directories,
                a.summary.total_size_formatted
            ),
            Self::Excalidraw(p) => write!(f, "excalidraw: {} elements", p.metadata.element_count),
            Self::Diff(p) => write!(
                f,
                "diff: {} files, +{} -{}",
                p.metadata.files_changed, p.metadata.additions, p.metadata.deletions
            ),
            Self::RelicIndex(p) => write!(f, "relic index: {} relics", p.metadata.count),
        }
    }
}
