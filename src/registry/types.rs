//! File type definition types

use serde::Serialize;

/// Coarse classification of a file type, driving preview dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Code,
    Text,
    Markdown,
    Html,
    Csv,
    Image,
    Pdf,
    Archive,
    Excalidraw,
    Unknown,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: [Self; 10] = [
        Self::Code,
        Self::Text,
        Self::Markdown,
        Self::Html,
        Self::Csv,
        Self::Image,
        Self::Pdf,
        Self::Archive,
        Self::Excalidraw,
        Self::Unknown,
    ];

    /// Lowercase name of the category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Archive => "archive",
            Self::Excalidraw => "excalidraw",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a category name; anything unrecognised maps to `Unknown`
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Self::Unknown)
    }

    /// Whether content of this category is stored as binary
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Image | Self::Pdf | Self::Archive | Self::Unknown)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the type registry
///
/// The first extension in `extensions` is the canonical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileTypeDefinition {
    /// Syntax identifier shared with language detection and highlighting
    pub syntax: &'static str,
    /// Human readable label
    pub label: &'static str,
    /// Canonical MIME type
    pub mime: &'static str,
    /// File extensions without the leading dot
    pub extensions: &'static [&'static str],
    /// Coarse category
    pub category: Category,
}

impl FileTypeDefinition {
    /// Canonical extension, if the definition has any
    #[must_use]
    pub fn canonical_extension(&self) -> Option<&'static str> {
        self.extensions.first().copied()
    }

    /// Whether `ext` (without dot, any case) is one of this definition's extensions
    #[must_use]
    pub fn has_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
