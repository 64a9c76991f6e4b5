//! Archive value types

use serde::Serialize;

use super::error::{ArchiveError, Result};

/// Container format of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArchiveKind {
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "tar")]
    Tar,
    #[serde(rename = "tar.gz")]
    TarGz,
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

impl ArchiveKind {
    /// Detect the container format from a declared content type
    ///
    /// `gzip` is checked before `zip` because the former contains the latter.
    ///
    /// # Errors
    /// Returns `ArchiveError::UnsupportedArchive` when the type names no
    /// supported container.
    ///
    /// # Examples
    /// ```
    /// # use relic_preview::archive::ArchiveKind;
    /// assert_eq!(ArchiveKind::detect("application/x-gzip").unwrap(), ArchiveKind::TarGz);
    /// assert_eq!(ArchiveKind::detect("application/zip").unwrap(), ArchiveKind::Zip);
    /// assert!(ArchiveKind::detect("application/x-rar").is_err());
    /// ```
    pub fn detect(declared: &str) -> Result<Self> {
        let lowered = declared.to_lowercase();
        if lowered.contains("gzip") || lowered.contains("x-gzip") {
            Ok(Self::TarGz)
        } else if lowered.contains("tar") {
            Ok(Self::Tar)
        } else if lowered.contains("zip") {
            Ok(Self::Zip)
        } else {
            Err(ArchiveError::UnsupportedArchive(declared.to_string()))
        }
    }

    /// Detect the format, correcting a declared plain tar that is gzip-wrapped
    ///
    /// # Errors
    /// Same as [`ArchiveKind::detect`].
    pub fn detect_with_content(declared: &str, bytes: &[u8]) -> Result<Self> {
        match Self::detect(declared)? {
            Self::Tar if bytes.starts_with(&GZIP_MAGIC) => Ok(Self::TarGz),
            kind => Ok(kind),
        }
    }

    /// Short name as reported in metadata
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an archive member is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Sort rank among siblings: directories first
    #[must_use]
    pub const fn sort_rank(self) -> u8 {
        match self {
            Self::Directory => 0,
            Self::File => 1,
        }
    }
}

/// Content extracted from an archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// Decoded text
    Text(String),
    /// Raw bytes
    Binary(Vec<u8>),
}

impl Extracted {
    /// Length of the content in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The content as bytes, regardless of how it was decoded
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// The decoded text, if the entry was classified as text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }
}

/// How an entry's bytes are returned from extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    Text,
    Binary,
}

const BINARY_MARKERS: [&str; 8] = [
    "image", "video", "audio", "pdf", "zip", "tar", "gzip", "octet-stream",
];
const TEXT_MARKERS: [&str; 6] = ["text", "json", "javascript", "typescript", "xml", "html"];

impl ExtractMode {
    /// Classify a member content type for extraction
    ///
    /// Binary markers win over text markers; anything matching neither is
    /// returned as raw bytes.
    #[must_use]
    pub fn for_content_type(content_type: &str) -> Self {
        let lowered = content_type.to_lowercase();
        if BINARY_MARKERS.iter().any(|m| lowered.contains(m)) {
            Self::Binary
        } else if TEXT_MARKERS.iter().any(|m| lowered.contains(m)) {
            Self::Text
        } else {
            Self::Binary
        }
    }

    /// Turn raw member bytes into extracted content
    #[must_use]
    pub fn decode(self, bytes: Vec<u8>) -> Extracted {
        match self {
            Self::Text => match String::from_utf8(bytes) {
                Ok(text) => Extracted::Text(text),
                Err(err) => Extracted::Text(String::from_utf8_lossy(err.as_bytes()).into_owned()),
            },
            Self::Binary => Extracted::Binary(bytes),
        }
    }
}

/// Summary statistics of an opened archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    /// Number of file entries
    pub total_files: usize,
    /// Number of directories in the tree, implicit ones included
    pub total_directories: usize,
    /// Sum of file sizes in bytes
    pub total_size: u64,
    /// `total_size` in human readable form
    pub total_size_formatted: String,
    /// Container format
    pub archive_type: ArchiveKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_never_detected_as_zip() {
        for declared in ["application/gzip", "application/x-gzip", "APPLICATION/GZIP", "multipart/gzip-zip"] {
            assert_eq!(ArchiveKind::detect(declared).unwrap(), ArchiveKind::TarGz);
        }
    }

    #[test]
    fn test_detect_tar_and_zip() {
        assert_eq!(ArchiveKind::detect("application/x-tar").unwrap(), ArchiveKind::Tar);
        assert_eq!(ArchiveKind::detect("application/zip").unwrap(), ArchiveKind::Zip);
        assert_eq!(
            ArchiveKind::detect("application/x-zip-compressed").unwrap(),
            ArchiveKind::Zip
        );
    }

    #[test]
    fn test_detect_unsupported() {
        let err = ArchiveKind::detect("application/x-7z-compressed").unwrap_err();
        assert!(matches!(err, ArchiveError::UnsupportedArchive(_)));
    }

    #[test]
    fn test_declared_tar_with_gzip_magic() {
        let kind = ArchiveKind::detect_with_content("application/x-tar", &[0x1f, 0x8b, 0x08]).unwrap();
        assert_eq!(kind, ArchiveKind::TarGz);
    }

    #[test]
    fn test_extract_mode_classification() {
        assert_eq!(ExtractMode::for_content_type("text/x-python"), ExtractMode::Text);
        assert_eq!(ExtractMode::for_content_type("application/json"), ExtractMode::Text);
        assert_eq!(ExtractMode::for_content_type("image/svg+xml"), ExtractMode::Binary);
        assert_eq!(ExtractMode::for_content_type("application/octet-stream"), ExtractMode::Binary);
        assert_eq!(ExtractMode::for_content_type("application/x-yaml"), ExtractMode::Binary);
    }

    #[test]
    fn test_lossy_text_decode() {
        let extracted = ExtractMode::Text.decode(vec![b'o', b'k', 0xff]);
        assert_eq!(extracted.as_text(), Some("ok\u{fffd}"));
    }
}
