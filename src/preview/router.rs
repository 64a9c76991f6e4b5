//! Content routing
//!
//! Turns a [`ContentDescriptor`] into exactly one [`ProcessedPreview`]. The
//! declared content type is consulted first, but it is not trusted blindly:
//! text-like content is checked for relic indexes and diffs, and content
//! without a usable type is sniffed from its magic bytes.

use std::sync::LazyLock;

use tokio_util::sync::CancellationToken;

use super::error::{PreviewError, Result};
use super::types::{ContentDescriptor, DiffMetadata, DiffPreview, ProcessedPreview};
use crate::archive::{open_archive, ArchiveError};
use crate::config::PreviewSettings;
use crate::diff::{looks_like_diff, parse_diff};
use crate::highlight::{CodeProcessor, TextStats, PLAINTEXT};
use crate::index::{looks_like_index, parse_index, RelicIndexPreview, RELIC_INDEX_MIME};
use crate::media::{
    delimiter_for, looks_like_excalidraw, process_csv, process_excalidraw, process_html,
    process_image, process_pdf, sniff_image_format,
};
use crate::registry::{Category, Registry};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const EMPTY_ZIP_MAGIC: &[u8] = b"PK\x05\x06";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const PDF_MAGIC: &[u8] = b"%PDF-";
const USTAR_OFFSET: usize = 257;

static DEFAULT_ROUTER: LazyLock<ContentRouter> = LazyLock::new(ContentRouter::default);

/// Classify content with a router over the built-in registry and default settings
///
/// # Errors
/// See [`ContentRouter::classify`].
pub fn classify(
    bytes: &[u8],
    declared_content_type: Option<&str>,
    language_hint: Option<&str>,
) -> Result<ProcessedPreview> {
    DEFAULT_ROUTER.classify(
        &ContentDescriptor::new(bytes)
            .with_content_type(declared_content_type)
            .with_language_hint(language_hint),
    )
}

/// Dispatches content to the processor for its kind
///
/// Holds no per-call state and can be shared between threads.
#[derive(Debug)]
pub struct ContentRouter {
    registry: Registry,
    processor: CodeProcessor,
    csv_preview_rows: usize,
}

impl Default for ContentRouter {
    fn default() -> Self {
        Self::new(Registry::builtin(), &PreviewSettings::default())
    }
}

fn is_auto_hint(hint: &str) -> bool {
    hint.is_empty() || hint.eq_ignore_ascii_case("auto") || hint.eq_ignore_ascii_case("text")
}

/// Declared-type independent container sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Magic {
    Zip,
    TarGz,
    Tar,
    Pdf,
    Image,
}

fn sniff_magic(bytes: &[u8]) -> Option<Magic> {
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(EMPTY_ZIP_MAGIC) {
        Some(Magic::Zip)
    } else if bytes.starts_with(GZIP_MAGIC) {
        Some(Magic::TarGz)
    } else if bytes.get(USTAR_OFFSET..USTAR_OFFSET + 5) == Some(b"ustar".as_slice()) {
        Some(Magic::Tar)
    } else if bytes.starts_with(PDF_MAGIC) {
        Some(Magic::Pdf)
    } else if sniff_image_format(bytes).is_some() {
        Some(Magic::Image)
    } else {
        None
    }
}

impl ContentRouter {
    #[must_use]
    pub fn new(registry: Registry, settings: &PreviewSettings) -> Self {
        Self {
            registry,
            processor: CodeProcessor::new(registry, settings.highlight.clone()),
            csv_preview_rows: settings.csv.preview_rows,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn processor(&self) -> &CodeProcessor {
        &self.processor
    }

    /// Classify content into a preview
    ///
    /// # Errors
    /// * `PreviewError::Archive` if a declared archive cannot be opened.
    /// * `PreviewError::Pdf` if PDF bytes cannot be parsed.
    pub fn classify(&self, content: &ContentDescriptor<'_>) -> Result<ProcessedPreview> {
        self.classify_cancellable(content, &CancellationToken::new())
    }

    /// Classify content, aborting when `cancel` fires
    ///
    /// # Errors
    /// As [`ContentRouter::classify`], plus `PreviewError::Cancelled`.
    pub fn classify_cancellable(
        &self,
        content: &ContentDescriptor<'_>,
        cancel: &CancellationToken,
    ) -> Result<ProcessedPreview> {
        if cancel.is_cancelled() {
            return Err(PreviewError::Cancelled);
        }

        let declared = content
            .declared_content_type
            .map(str::trim)
            .filter(|d| !d.is_empty());
        let hint = content
            .language_hint
            .map(str::trim)
            .filter(|h| !h.is_empty());

        if declared.is_some_and(|d| d.to_lowercase().starts_with(RELIC_INDEX_MIME)) {
            tracing::debug!("declared relic index");
            return Ok(self.index_preview(&decode_text(content.bytes)));
        }

        let definition = declared.map(|d| self.registry.resolve(Some(d)));
        let is_diff = hint.is_some_and(|h| h.eq_ignore_ascii_case("diff"))
            || definition.is_some_and(|def| def.syntax == "diff");
        if is_diff {
            tracing::debug!("declared diff");
            return self.diff_preview(&decode_text(content.bytes), cancel);
        }

        let Some((declared, definition)) = declared.zip(definition) else {
            return self.sniff(content, hint, cancel);
        };

        tracing::debug!(
            declared,
            syntax = definition.syntax,
            category = %definition.category,
            "routing by declared type"
        );

        match definition.category {
            Category::Image => Ok(ProcessedPreview::Image(process_image(
                content.bytes,
                Some(declared),
            ))),
            Category::Pdf => Ok(ProcessedPreview::Pdf(process_pdf(
                content.bytes,
                content.password,
            )?)),
            Category::Archive => open_archive(content.bytes, declared, &self.registry, cancel)
                .map(ProcessedPreview::Archive)
                .map_err(archive_error),
            Category::Csv => {
                let text = decode_text(content.bytes);
                self.csv_preview(&text, delimiter_for(definition.syntax))
            }
            Category::Html => {
                let text = decode_text(content.bytes);
                Ok(ProcessedPreview::Html(process_html(&self.processor, &text, cancel)?))
            }
            Category::Excalidraw => self.excalidraw_preview(&decode_text(content.bytes), cancel),
            Category::Code | Category::Markdown => {
                let text = decode_text(content.bytes);
                let language = self.processor.detect_language(&text, Some(declared), hint);
                self.code_preview(&text, &language, cancel)
            }
            Category::Text => self.text_like(&decode_text(content.bytes), hint, false, cancel),
            Category::Unknown => self.sniff(content, hint, cancel),
        }
    }

    /// Route content whose declared type is absent or unusable
    fn sniff(
        &self,
        content: &ContentDescriptor<'_>,
        hint: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ProcessedPreview> {
        let bytes = content.bytes;
        let magic = sniff_magic(bytes);
        tracing::debug!(?magic, "sniffing content");

        match magic {
            Some(Magic::Zip) => return self.sniffed_archive(bytes, "application/zip", cancel),
            Some(Magic::TarGz) => return self.sniffed_archive(bytes, "application/gzip", cancel),
            Some(Magic::Tar) => return self.sniffed_archive(bytes, "application/x-tar", cancel),
            Some(Magic::Pdf) => {
                return Ok(ProcessedPreview::Pdf(process_pdf(bytes, content.password)?));
            }
            Some(Magic::Image) => return Ok(ProcessedPreview::Image(process_image(bytes, None))),
            None => {}
        }

        match std::str::from_utf8(bytes) {
            Ok(text) if !text.contains('\0') => {
                if looks_like_excalidraw(text) {
                    return self.excalidraw_preview(text, cancel);
                }
                self.text_like(text, hint, true, cancel)
            }
            _ => {
                tracing::debug!("binary content, showing lossy text");
                Ok(ProcessedPreview::Text(
                    self.processor.process_text(&String::from_utf8_lossy(bytes)),
                ))
            }
        }
    }

    /// Sniffed containers that fail to open degrade to text instead of failing
    fn sniffed_archive(
        &self,
        bytes: &[u8],
        content_type: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessedPreview> {
        match open_archive(bytes, content_type, &self.registry, cancel) {
            Ok(result) => Ok(ProcessedPreview::Archive(result)),
            Err(ArchiveError::Cancelled) => Err(PreviewError::Cancelled),
            Err(err) => {
                tracing::warn!(error = %err, "sniffed archive failed to open, showing as text");
                Ok(ProcessedPreview::Text(
                    self.processor.process_text(&String::from_utf8_lossy(bytes)),
                ))
            }
        }
    }

    /// Text that may turn out to be an index, a diff or code
    ///
    /// With `sniff_code`, untyped text whose language can be detected is shown
    /// as code.
    fn text_like(
        &self,
        text: &str,
        hint: Option<&str>,
        sniff_code: bool,
        cancel: &CancellationToken,
    ) -> Result<ProcessedPreview> {
        if looks_like_index(text, None) {
            tracing::debug!("content looks like a relic index");
            return Ok(self.index_preview(text));
        }
        if looks_like_diff(text) {
            tracing::debug!("content looks like a diff");
            return self.diff_preview(text, cancel);
        }
        if let Some(hint) = hint.filter(|h| !is_auto_hint(h)) {
            return self.code_preview(text, hint, cancel);
        }
        if sniff_code {
            let language = self.processor.sniff_language(text);
            if language != PLAINTEXT {
                tracing::debug!(language = %language, "sniffed code");
                return self.code_preview(text, &language, cancel);
            }
        }
        Ok(ProcessedPreview::Text(self.processor.process_text(text)))
    }

    fn code_preview(
        &self,
        text: &str,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessedPreview> {
        Ok(ProcessedPreview::Code(
            self.processor.process_code_cancellable(text, language, cancel)?,
        ))
    }

    fn diff_preview(&self, text: &str, cancel: &CancellationToken) -> Result<ProcessedPreview> {
        let highlighted = self.processor.highlight_cancellable(text, "diff", cancel)?;
        let files = parse_diff(text);
        let stats = TextStats::of(text);
        Ok(ProcessedPreview::Diff(DiffPreview {
            metadata: DiffMetadata {
                line_count: stats.line_count,
                char_count: stats.char_count,
                language: "diff".to_string(),
                files_changed: files.len(),
                additions: files.iter().map(|f| f.additions()).sum(),
                deletions: files.iter().map(|f| f.deletions()).sum(),
            },
            preview: text.to_string(),
            highlighted,
            files,
        }))
    }

    fn index_preview(&self, text: &str) -> ProcessedPreview {
        ProcessedPreview::RelicIndex(RelicIndexPreview::from(parse_index(text)))
    }

    fn csv_preview(&self, text: &str, delimiter: u8) -> Result<ProcessedPreview> {
        match process_csv(text, delimiter, self.csv_preview_rows) {
            Ok(preview) => Ok(ProcessedPreview::Csv(preview)),
            Err(err) => {
                tracing::warn!(error = %err, "unreadable table, showing as text");
                Ok(ProcessedPreview::Text(self.processor.process_text(text)))
            }
        }
    }

    fn excalidraw_preview(&self, text: &str, cancel: &CancellationToken) -> Result<ProcessedPreview> {
        match process_excalidraw(text) {
            Ok(preview) => Ok(ProcessedPreview::Excalidraw(preview)),
            Err(err) => {
                tracing::warn!(error = %err, "unreadable drawing, showing as json");
                self.code_preview(text, "json", cancel)
            }
        }
    }
}

fn archive_error(err: ArchiveError) -> PreviewError {
    match err {
        ArchiveError::Cancelled => PreviewError::Cancelled,
        other => PreviewError::Archive(other),
    }
}

fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveKind;
    use crate::testing::{gzip_bytes, tar_bytes, tar_gz_bytes, zip_bytes, TWO_FILE_DIFF};

    fn route(bytes: &[u8], declared: Option<&str>, hint: Option<&str>) -> ProcessedPreview {
        classify(bytes, declared, hint).unwrap()
    }

    #[test]
    fn test_router_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ContentRouter>();
    }

    #[test]
    fn test_declared_index_wins() {
        let preview = route(b"hello", Some("application/x-relic-index"), Some("python"));
        assert_eq!(preview.kind(), "relicindex");
    }

    #[test]
    fn test_diff_by_hint_and_by_type() {
        let by_hint = route(TWO_FILE_DIFF.as_bytes(), Some("text/plain"), Some("diff"));
        let ProcessedPreview::Diff(diff) = by_hint else {
            panic!("expected diff");
        };
        assert_eq!(diff.files.len(), 2);
        assert_eq!(diff.metadata.language, "diff");

        let by_type = route(b"--- a\n+++ b\n", Some("text/x-diff"), None);
        assert_eq!(by_type.kind(), "diff");
    }

    #[test]
    fn test_text_plain_is_sniffed_for_diffs() {
        let preview = route(TWO_FILE_DIFF.as_bytes(), Some("text/plain"), None);
        assert_eq!(preview.kind(), "diff");
    }

    #[test]
    fn test_text_plain_stays_text() {
        let preview = route(b"fn main() { let x = 1; }", Some("text/plain"), None);
        assert_eq!(preview.kind(), "text");
    }

    #[test]
    fn test_declared_code_detects_language() {
        let ProcessedPreview::Code(code) = route(b"x = 1\n", Some("text/x-python"), None) else {
            panic!("expected code");
        };
        assert_eq!(code.language, "python");
    }

    #[test]
    fn test_hint_on_text_makes_code() {
        let ProcessedPreview::Code(code) = route(b"x", Some("text/plain"), Some("ruby")) else {
            panic!("expected code");
        };
        assert_eq!(code.language, "ruby");
        assert_eq!(route(b"x", Some("text/plain"), Some("auto")).kind(), "text");
    }

    #[test]
    fn test_declared_archive() {
        let bytes = zip_bytes(&[("a.txt", "a")]);
        let ProcessedPreview::Archive(archive) = route(&bytes, Some("application/zip"), None) else {
            panic!("expected archive");
        };
        assert_eq!(archive.archive_type, ArchiveKind::Zip);
        assert_eq!(archive.extract_file("a.txt").unwrap().as_text(), Some("a"));
    }

    #[test]
    fn test_declared_archive_errors_are_fatal() {
        let err = classify(b"not a zip", Some("application/zip"), None).unwrap_err();
        assert!(matches!(err, PreviewError::Archive(ArchiveError::CorruptArchive(_))));
    }

    #[test]
    fn test_magic_sniffing_without_declared_type() {
        assert_eq!(route(&zip_bytes(&[("a", "a")]), None, None).kind(), "archive");
        assert_eq!(route(&tar_bytes(&[("a", "a")]), None, None).kind(), "archive");
        assert_eq!(route(&tar_gz_bytes(&[("a", "a")]), None, None).kind(), "archive");
        assert_eq!(
            route(b"\x89PNG\r\n\x1a\n", Some("application/octet-stream"), None).kind(),
            "image"
        );
    }

    #[test]
    fn test_sniffed_gzip_that_is_not_tar_degrades_to_text() {
        let preview = route(&gzip_bytes(b"just text"), None, None);
        assert_eq!(preview.kind(), "text");
    }

    #[test]
    fn test_bm_prefixed_prose_stays_text() {
        let note = b"BMW and Audi are German car makers, founded long ago.\n";
        assert_eq!(route(note, None, None).kind(), "text");
    }

    #[test]
    fn test_untyped_code_is_sniffed() {
        let source = b"import os\n\ndef main():\n    print(os.getcwd())\n";
        let ProcessedPreview::Code(code) = route(source, None, None) else {
            panic!("expected code");
        };
        assert_eq!(code.language, "python");
        assert_eq!(route(b"just a note", None, None).kind(), "text");
    }

    #[test]
    fn test_binary_falls_back_to_lossy_text() {
        let preview = route(&[0x00, 0xff, 0xfe, b'a'], None, None);
        assert_eq!(preview.kind(), "text");
    }

    #[test]
    fn test_csv_and_tsv() {
        let ProcessedPreview::Csv(csv) = route(b"a,b\n1,2\n", Some("text/csv"), None) else {
            panic!("expected csv");
        };
        assert_eq!(csv.columns, vec!["a", "b"]);

        let ProcessedPreview::Csv(tsv) =
            route(b"a\tb\n1\t2\n", Some("text/tab-separated-values"), None)
        else {
            panic!("expected csv");
        };
        assert_eq!(tsv.metadata.column_count, 2);
    }

    #[test]
    fn test_excalidraw_declared_and_sniffed() {
        let scene = br#"{"type": "excalidraw", "version": 2, "elements": []}"#;
        assert_eq!(
            route(scene, Some("application/vnd.excalidraw+json"), None).kind(),
            "excalidraw"
        );
        assert_eq!(route(scene, None, None).kind(), "excalidraw");

        let ProcessedPreview::Code(code) =
            route(b"{broken", Some("application/vnd.excalidraw+json"), None)
        else {
            panic!("expected code");
        };
        assert_eq!(code.language, "json");
    }

    #[test]
    fn test_html() {
        let ProcessedPreview::Html(html) =
            route(b"<title>Page</title><p>hi</p>", Some("text/html"), None)
        else {
            panic!("expected html");
        };
        assert_eq!(html.metadata.title.as_deref(), Some("Page"));
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let router = ContentRouter::default();
        let err = router
            .classify_cancellable(&ContentDescriptor::new(b"text"), &cancel)
            .unwrap_err();
        assert!(matches!(err, PreviewError::Cancelled));
    }

    #[test]
    fn test_json_tag_is_lowercase() {
        let json = route(b"0123456789abcdef0123456789abcdef\n", None, None)
            .to_json()
            .unwrap();
        assert_eq!(json["type"], "relicindex");
        assert_eq!(json["metadata"]["count"], 1);
    }
}
