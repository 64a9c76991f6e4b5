//! Preview error types

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::highlight::Cancelled;
use crate::media::PdfError;

/// Errors that can occur while classifying content
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The archive could not be opened
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The PDF could not be parsed
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// The relic source failed to deliver content
    #[error("Failed to fetch relic {id}: {message}")]
    Fetch { id: String, message: String },

    /// The cancellation token fired
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<Cancelled> for PreviewError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Result type for preview operations
pub type Result<T> = std::result::Result<T, PreviewError>;
