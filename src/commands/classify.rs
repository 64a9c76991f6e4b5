//! Classify command - classify a file and print its preview

use crate::{
    RelicError, output,
    preview::{ContentDescriptor, ContentRouter, ProcessedPreview},
    registry::resolve_content_type_for_path,
};
use std::path::Path;

type Result<T> = std::result::Result<T, RelicError>;

/// Options of a classify invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions<'a> {
    pub content_type: Option<&'a str>,
    pub by_extension: bool,
    pub hint: Option<&'a str>,
    pub password: Option<&'a str>,
    pub json: bool,
}

/// Execute the classify command
///
/// # Errors
/// Returns an error if the file cannot be read, classification fails, or the
/// preview cannot be serialised.
pub fn execute(router: &ContentRouter, path: &Path, options: ClassifyOptions<'_>, quiet: bool) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let declared = if options.by_extension {
        Some(resolve_content_type_for_path(&path.to_string_lossy()))
    } else {
        options.content_type
    };

    let descriptor = ContentDescriptor::new(&bytes)
        .with_content_type(declared)
        .with_language_hint(options.hint)
        .with_password(options.password);
    let preview = router.classify(&descriptor)?;
    tracing::info!(path = %path.display(), kind = preview.kind(), "classified");

    if options.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!("{}", output::preview_summary(&preview, quiet));
    if !quiet {
        print_details(&preview);
    }
    Ok(())
}

fn print_details(preview: &ProcessedPreview) {
    match preview {
        ProcessedPreview::Diff(diff) => {
            for file in &diff.files {
                println!("{}", output::diff_file_line(file, false));
            }
        }
        ProcessedPreview::Archive(archive) => {
            for line in output::tree_lines(&archive.file_tree, false) {
                println!("  {line}");
            }
        }
        ProcessedPreview::RelicIndex(index) => {
            if !index.metadata.title.is_empty() {
                println!("  {}", index.metadata.title);
            }
            for relic in &index.relics {
                match &relic.title {
                    Some(title) => println!("  {} {title}", relic.id),
                    None => println!("  {}", relic.id),
                }
            }
        }
        ProcessedPreview::Pdf(pdf) => {
            if let Some(metadata) = &pdf.metadata {
                if let Some(title) = &metadata.title {
                    println!("  Title: {title}");
                }
                if let Some(author) = &metadata.author {
                    println!("  Author: {author}");
                }
                if let Some(version) = &metadata.pdf_version {
                    println!("  Version: {version}");
                }
            } else {
                println!("  Use --password to open this document.");
            }
        }
        ProcessedPreview::Csv(csv) => {
            println!("  {}", csv.columns.join(" | "));
            for row in &csv.rows {
                println!("  {}", row.join(" | "));
            }
            if csv.has_more {
                println!("  ...");
            }
        }
        ProcessedPreview::Text(_)
        | ProcessedPreview::Code(_)
        | ProcessedPreview::Html(_)
        | ProcessedPreview::Image(_)
        | ProcessedPreview::Excalidraw(_) => {}
    }
}
