//! Archive commands - print a tree or extract one entry

use crate::{
    RelicError, output,
    archive::ArchiveResult,
    preview::{ContentDescriptor, ContentRouter, ProcessedPreview},
};
use std::io::Write;
use std::path::Path;

type Result<T> = std::result::Result<T, RelicError>;

fn open(router: &ContentRouter, path: &Path, content_type: Option<&str>) -> Result<ArchiveResult> {
    let bytes = std::fs::read(path)?;
    let descriptor = ContentDescriptor::new(&bytes).with_content_type(content_type);
    match router.classify(&descriptor)? {
        ProcessedPreview::Archive(archive) => Ok(archive),
        other => Err(RelicError::InvalidInput(format!(
            "{} is not an archive (classified as {})",
            path.display(),
            other.kind()
        ))),
    }
}

/// Execute the tree command
///
/// # Errors
/// Returns an error if the file cannot be read or is not an archive.
pub fn tree(router: &ContentRouter, path: &Path, content_type: Option<&str>, quiet: bool) -> Result<()> {
    let archive = open(router, path, content_type)?;
    if !quiet {
        println!("{}", output::preview_summary(&ProcessedPreview::Archive(archive.clone()), false));
    }
    for line in output::tree_lines(&archive.file_tree, quiet) {
        println!("{line}");
    }
    Ok(())
}

/// Execute the extract command, writing the entry to `out`
///
/// # Errors
/// Returns an error if the archive cannot be opened, the entry is missing or
/// is a directory, or writing fails.
pub fn extract(
    router: &ContentRouter,
    path: &Path,
    entry: &str,
    content_type: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let mut archive = open(router, path, content_type)?;
    let extracted = archive.extract_file(entry)?;
    out.write_all(extracted.as_bytes())?;
    out.flush()?;
    archive.close();
    Ok(())
}
