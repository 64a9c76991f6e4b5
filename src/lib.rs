//! relic-preview - content classification and preview extraction
//!
//! Uploaded content ("relics") arrives as opaque bytes with an unreliable
//! declared content type. This library classifies it and extracts a typed
//! preview: plain text, highlighted code, a parsed unified diff, a navigable
//! archive tree with lazy extraction, a relic index, or an envelope for
//! images, PDFs, tables, HTML and drawings.
//!
//! ```
//! use relic_preview::preview::{classify, ProcessedPreview};
//!
//! let preview = classify(b"--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b\n", None, None).unwrap();
//! assert!(matches!(preview, ProcessedPreview::Diff(_)));
//! ```

use thiserror::Error;

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod highlight;
pub mod index;
pub mod media;
pub mod output;
pub mod preview;
pub mod registry;
pub mod units;

#[cfg(test)]
pub mod testing;

pub use preview::{classify, ContentDescriptor, ContentRouter, ProcessedPreview};
pub use registry::resolve_content_type_for_path;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum RelicError {
    /// Classification error
    #[error("Preview error: {0}")]
    PreviewError(#[from] preview::PreviewError),
    /// Archive error
    #[error("Archive error: {0}")]
    ArchiveError(#[from] archive::ArchiveError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON serialisation error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
