//! Open archive handles and per-entry reads

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Mutex;

use flate2::read::GzDecoder;
use tokio_util::sync::CancellationToken;
use zip::ZipArchive;

use super::error::{ArchiveError, Result};
use super::types::{ArchiveKind, EntryKind};

const CHUNK_SIZE: usize = 64 * 1024;

/// A member as listed by the underlying container reader
#[derive(Debug, Clone)]
pub(crate) struct RawMember {
    pub path: String,
    pub size: u64,
    pub kind: EntryKind,
}

/// Location of a tar member's data inside the decoded tar stream
#[derive(Debug, Clone, Copy)]
struct TarSpan {
    offset: usize,
    len: usize,
}

/// The decoded container an archive result reads entries from
pub(crate) enum ArchiveHandle {
    Zip(Mutex<ZipArchive<Cursor<Vec<u8>>>>),
    Tar {
        data: Vec<u8>,
        spans: HashMap<String, TarSpan>,
    },
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zip(_) => f.write_str("ArchiveHandle::Zip"),
            Self::Tar { data, spans } => f
                .debug_struct("ArchiveHandle::Tar")
                .field("bytes", &data.len())
                .field("members", &spans.len())
                .finish(),
        }
    }
}

impl ArchiveHandle {
    /// Decode `bytes` as `kind` and list its members in source order
    pub fn open(
        kind: ArchiveKind,
        bytes: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(Self, Vec<RawMember>)> {
        match kind {
            ArchiveKind::Zip => Self::open_zip(bytes.to_vec(), cancel),
            ArchiveKind::Tar => Self::open_tar(bytes.to_vec(), cancel),
            ArchiveKind::TarGz => {
                let data = gunzip(bytes, cancel)?;
                Self::open_tar(data, cancel)
            }
        }
    }

    fn open_zip(bytes: Vec<u8>, cancel: &CancellationToken) -> Result<(Self, Vec<RawMember>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(ArchiveError::corrupt)?;

        let mut members = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            if cancel.is_cancelled() {
                return Err(ArchiveError::Cancelled);
            }
            let file = archive.by_index(index).map_err(ArchiveError::corrupt)?;
            let path = file.name().to_string();
            let kind = if file.is_dir() || path.ends_with('/') {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            members.push(RawMember {
                path,
                size: file.size(),
                kind,
            });
        }

        Ok((Self::Zip(Mutex::new(archive)), members))
    }

    fn open_tar(data: Vec<u8>, cancel: &CancellationToken) -> Result<(Self, Vec<RawMember>)> {
        let mut members = Vec::new();
        let mut spans = HashMap::new();

        {
            let mut archive = tar::Archive::new(data.as_slice());
            let entries = archive.entries().map_err(ArchiveError::corrupt)?;
            for entry in entries {
                if cancel.is_cancelled() {
                    return Err(ArchiveError::Cancelled);
                }
                let entry = entry.map_err(ArchiveError::corrupt)?;
                let entry_type = entry.header().entry_type();
                let path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();

                let kind = if entry_type.is_dir() || path.ends_with('/') {
                    EntryKind::Directory
                } else if entry_type.is_file() {
                    EntryKind::File
                } else {
                    tracing::debug!(path = %path, "skipping non-regular tar member");
                    continue;
                };

                let size = entry.size();
                if kind == EntryKind::File {
                    let offset = usize::try_from(entry.raw_file_position())
                        .map_err(ArchiveError::corrupt)?;
                    let len = usize::try_from(size).map_err(ArchiveError::corrupt)?;
                    if offset.saturating_add(len) > data.len() {
                        return Err(ArchiveError::corrupt(format!(
                            "member {path} extends past end of archive"
                        )));
                    }
                    spans.insert(path.clone(), TarSpan { offset, len });
                }
                members.push(RawMember { path, size, kind });
            }
        }

        Ok((Self::Tar { data, spans }, members))
    }

    /// Read the full content of a file member
    pub fn read(&self, path: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(ArchiveError::Cancelled);
        }
        match self {
            Self::Zip(archive) => {
                let mut archive = archive
                    .lock()
                    .map_err(|_| ArchiveError::corrupt("archive handle poisoned"))?;
                let file = archive.by_name(path).map_err(|err| match err {
                    zip::result::ZipError::FileNotFound => {
                        ArchiveError::EntryNotFound(path.to_string())
                    }
                    other => ArchiveError::corrupt(other),
                })?;
                read_chunked(file, cancel)
            }
            Self::Tar { data, spans } => {
                let span = spans
                    .get(path)
                    .ok_or_else(|| ArchiveError::EntryNotFound(path.to_string()))?;
                Ok(data[span.offset..span.offset + span.len].to_vec())
            }
        }
    }
}

/// Decompress a gzip stream, checking for cancellation between chunks
pub(crate) fn gunzip(bytes: &[u8], cancel: &CancellationToken) -> Result<Vec<u8>> {
    read_chunked(GzDecoder::new(bytes), cancel)
}

fn read_chunked(mut reader: impl Read, cancel: &CancellationToken) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        if cancel.is_cancelled() {
            return Err(ArchiveError::Cancelled);
        }
        let read = reader.read(&mut buf).map_err(ArchiveError::corrupt)?;
        if read == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..read]);
    }
}
