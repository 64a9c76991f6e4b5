//! Archive error types

use thiserror::Error;

/// Errors that can occur while opening an archive or extracting its entries
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The declared content type names no supported container
    #[error("Unsupported archive type: {0}")]
    UnsupportedArchive(String),

    /// The container could not be parsed; carries the decoder's message
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    /// Extraction was requested after the owning result released the archive
    #[error("Archive has been closed")]
    Closed,

    /// No entry with the requested path
    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),

    /// Directories have no content to extract
    #[error("Entry is a directory: {0}")]
    IsDirectory(String),

    /// The operation was cancelled through its token
    #[error("Archive operation cancelled")]
    Cancelled,
}

impl ArchiveError {
    #[must_use]
    pub fn corrupt(message: impl std::fmt::Display) -> Self {
        Self::CorruptArchive(message.to_string())
    }
}

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
