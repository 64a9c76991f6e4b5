//! Archive extraction
//!
//! Opens ZIP, TAR and TAR.GZ containers held in memory, lists their members,
//! reconstructs a navigable file tree and extracts individual entries on
//! demand.
//!
//! The decoded container is owned by the [`ArchiveResult`]. Entries only hold
//! a weak reference to it, so extracting through an entry after the result
//! was closed or dropped fails with [`ArchiveError::Closed`] instead of
//! keeping the archive alive.

mod error;
mod handle;
mod tree;
mod types;

use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::registry::Registry;
use crate::units::format_size;
use handle::ArchiveHandle;

pub use error::{ArchiveError, Result};
pub use tree::{build_file_tree, FileTreeNode};
pub use types::{ArchiveKind, ArchiveSummary, EntryKind, ExtractMode, Extracted};

/// One member (file or directory) of an opened archive
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// Posix-style path inside the archive
    pub path: String,
    /// Basename
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
    pub kind: EntryKind,
    /// MIME type resolved from the path's extension
    pub content_type: String,
    /// Syntax id derived from `content_type`
    pub language_hint: String,
    #[serde(skip)]
    handle: Weak<ArchiveHandle>,
}

impl ArchiveEntry {
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// How this entry's content will be decoded
    #[must_use]
    pub fn extract_mode(&self) -> ExtractMode {
        ExtractMode::for_content_type(&self.content_type)
    }

    /// Extract this entry's content
    ///
    /// # Errors
    /// * `ArchiveError::Closed` if the owning result has been closed or dropped.
    /// * `ArchiveError::IsDirectory` for directory entries.
    /// * `ArchiveError::CorruptArchive` if the member cannot be decoded.
    pub fn extract(&self) -> Result<Extracted> {
        self.extract_cancellable(&CancellationToken::new())
    }

    /// Extract this entry's content, aborting when `cancel` fires
    ///
    /// # Errors
    /// As [`ArchiveEntry::extract`], plus `ArchiveError::Cancelled`.
    pub fn extract_cancellable(&self, cancel: &CancellationToken) -> Result<Extracted> {
        let handle = self.handle.upgrade().ok_or(ArchiveError::Closed)?;
        self.extract_from(&handle, cancel)
    }

    fn extract_from(&self, handle: &ArchiveHandle, cancel: &CancellationToken) -> Result<Extracted> {
        if self.is_directory() {
            return Err(ArchiveError::IsDirectory(self.path.clone()));
        }
        let bytes = handle.read(&self.path, cancel)?;
        Ok(self.extract_mode().decode(bytes))
    }
}

/// An opened archive: flat entry list, file tree, summary and the open handle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResult {
    pub archive_type: ArchiveKind,
    /// Entries in source order
    pub files: Vec<ArchiveEntry>,
    pub file_tree: FileTreeNode,
    #[serde(rename = "metadata")]
    pub summary: ArchiveSummary,
    #[serde(skip)]
    handle: Option<Arc<ArchiveHandle>>,
}

impl ArchiveResult {
    /// Open an archive using the built-in registry
    ///
    /// # Errors
    /// See [`open_archive`].
    pub fn open(bytes: &[u8], declared_content_type: &str) -> Result<Self> {
        open_archive(
            bytes,
            declared_content_type,
            &Registry::builtin(),
            &CancellationToken::new(),
        )
    }

    /// Whether the archive handle is still held
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Release the archive handle
    ///
    /// Clones of this result share the handle; it is freed once every clone
    /// has been closed or dropped.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            tracing::debug!(archive_type = %self.archive_type, "archive closed");
        }
    }

    /// Look up an entry by path (a trailing `/` is ignored)
    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&ArchiveEntry> {
        let wanted = path.trim_end_matches('/');
        self.files
            .iter()
            .find(|e| e.path.trim_end_matches('/') == wanted)
    }

    /// Extract an entry by path
    ///
    /// # Errors
    /// * `ArchiveError::Closed` after [`ArchiveResult::close`].
    /// * `ArchiveError::EntryNotFound` if no entry has this path.
    /// * `ArchiveError::IsDirectory` for directories.
    /// * `ArchiveError::CorruptArchive` if the member cannot be decoded.
    pub fn extract_file(&self, path: &str) -> Result<Extracted> {
        self.extract_file_cancellable(path, &CancellationToken::new())
    }

    /// Extract an entry by path, aborting when `cancel` fires
    ///
    /// # Errors
    /// As [`ArchiveResult::extract_file`], plus `ArchiveError::Cancelled`.
    pub fn extract_file_cancellable(&self, path: &str, cancel: &CancellationToken) -> Result<Extracted> {
        let handle = self.handle.as_ref().ok_or(ArchiveError::Closed)?;
        let entry = self
            .entry(path)
            .ok_or_else(|| ArchiveError::EntryNotFound(path.to_string()))?;
        entry.extract_from(handle, cancel)
    }
}

/// Open an archive from memory
///
/// The container format comes from the declared content type (see
/// [`ArchiveKind::detect`]). Members are listed in source order; each gets a
/// content type resolved from its path and a language hint derived from that
/// content type.
///
/// # Errors
/// * `ArchiveError::UnsupportedArchive` if the declared type names no supported container.
/// * `ArchiveError::CorruptArchive` if decoding fails.
/// * `ArchiveError::Cancelled` if `cancel` fires while decoding.
pub fn open_archive(
    bytes: &[u8],
    declared_content_type: &str,
    registry: &Registry,
    cancel: &CancellationToken,
) -> Result<ArchiveResult> {
    let kind = ArchiveKind::detect_with_content(declared_content_type, bytes)?;
    let (handle, members) = ArchiveHandle::open(kind, bytes, cancel)?;
    let handle = Arc::new(handle);

    let files: Vec<ArchiveEntry> = members
        .into_iter()
        .map(|member| {
            let content_type = registry.resolve_content_type_for_path(&member.path);
            let language_hint = registry.resolve(Some(content_type)).syntax;
            let name = member
                .path
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            ArchiveEntry {
                path: member.path,
                name,
                size: member.size,
                kind: member.kind,
                content_type: content_type.to_string(),
                language_hint: language_hint.to_string(),
                handle: Arc::downgrade(&handle),
            }
        })
        .collect();

    let file_tree = build_file_tree(&files);
    let total_size: u64 = files
        .iter()
        .filter(|e| !e.is_directory())
        .map(|e| e.size)
        .sum();
    let summary = ArchiveSummary {
        total_files: files.iter().filter(|e| !e.is_directory()).count(),
        total_directories: file_tree.count_directories(),
        total_size,
        total_size_formatted: format_size(total_size),
        archive_type: kind,
    };

    tracing::debug!(
        archive_type = %kind,
        files = summary.total_files,
        directories = summary.total_directories,
        total_size,
        "archive opened"
    );

    Ok(ArchiveResult {
        archive_type: kind,
        files,
        file_tree,
        summary,
        handle: Some(handle),
    })
}
