//! PDF inspection
//!
//! Loads the document with `lopdf` to report page count, document info and
//! outline presence. Encrypted documents are first tried with the empty user
//! password; if that fails the caller has to supply one.

use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while reading a PDF
#[derive(Debug, Error)]
pub enum PdfError {
    /// The bytes are not a readable PDF document
    #[error("Failed to parse PDF: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMetadata {
    pub num_pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub has_outline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_version: Option<String>,
}

/// How far the document could be opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PdfAccess {
    Opened,
    /// Encrypted and no password was supplied
    PasswordRequired,
    /// The supplied password was rejected
    PasswordIncorrect { reason: String },
}

/// PDF preview payload
///
/// `metadata` is absent unless the document was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPreview {
    pub access: PdfAccess,
    pub password_required: bool,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PdfMetadata>,
}

impl PdfPreview {
    fn locked(access: PdfAccess, size: u64) -> Self {
        Self {
            access,
            password_required: true,
            size,
            metadata: None,
        }
    }
}

/// Inspect a PDF, optionally decrypting it with `password`
///
/// # Errors
/// Returns `PdfError::Parse` if the bytes cannot be loaded as a PDF.
pub fn process_pdf(bytes: &[u8], password: Option<&str>) -> Result<PdfPreview, PdfError> {
    let size = bytes.len() as u64;
    let mut doc = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        match password {
            None => {
                if doc.decrypt("").is_err() {
                    tracing::debug!("pdf is encrypted, password required");
                    return Ok(PdfPreview::locked(PdfAccess::PasswordRequired, size));
                }
            }
            Some(password) => {
                if let Err(err) = doc.decrypt(password) {
                    tracing::debug!(error = %err, "pdf password rejected");
                    return Ok(PdfPreview::locked(
                        PdfAccess::PasswordIncorrect {
                            reason: err.to_string(),
                        },
                        size,
                    ));
                }
            }
        }
    }

    Ok(PdfPreview {
        access: PdfAccess::Opened,
        password_required: false,
        size,
        metadata: Some(read_metadata(&doc)),
    })
}

fn read_metadata(doc: &Document) -> PdfMetadata {
    let info = info_dictionary(doc);
    let text = |key: &[u8]| {
        info.and_then(|d| d.get(key).ok())
            .and_then(|obj| decode_text(doc, obj))
            .filter(|s| !s.is_empty())
    };

    PdfMetadata {
        num_pages: doc.get_pages().len(),
        title: text(b"Title"),
        author: text(b"Author"),
        has_outline: doc
            .catalog()
            .is_ok_and(|catalog| catalog.has(b"Outlines")),
        pdf_version: Some(doc.version.clone()).filter(|v| !v.is_empty()),
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    let (_, resolved) = doc.dereference(info).ok()?;
    resolved.as_dict().ok()
}

fn decode_text(doc: &Document, obj: &Object) -> Option<String> {
    let (_, resolved) = doc.dereference(obj).ok()?;
    match resolved {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8 with BOM, else Latin-1
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xfe, 0xff]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xef, 0xbb, 0xbf]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{StringFormat, dictionary};

    /// Standard security handler, RC4 40-bit, user password "secret",
    /// owner password "owner", permissions -4 and the file id 00..0f
    const USER_PASSWORD: &str = "secret";
    const OWNER_ENTRY: [u8; 32] = [
        0x92, 0xfe, 0x0f, 0x44, 0x54, 0xad, 0x4c, 0x96, 0x44, 0x69, 0x3f, 0x33, 0xc0, 0x7c, 0xb5, 0x4f,
        0x58, 0x7d, 0xce, 0x1e, 0x26, 0x82, 0xfe, 0x9e, 0xce, 0xa6, 0x10, 0x7a, 0x1e, 0xf6, 0x30, 0xdd,
    ];
    const USER_ENTRY: [u8; 32] = [
        0xa2, 0xd9, 0x8d, 0xd9, 0x34, 0x74, 0x87, 0x5e, 0xc9, 0x5c, 0x60, 0x44, 0x5c, 0x51, 0xfe, 0x1d,
        0xf3, 0x5f, 0xfa, 0xac, 0x7d, 0xa1, 0xba, 0xca, 0x62, 0x90, 0x58, 0xb1, 0xc0, 0x8a, 0x8e, 0x39,
    ];

    fn save(doc: &mut Document) -> Vec<u8> {
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn sample_pdf(with_outline: bool) -> Vec<u8> {
        save(&mut sample_document(with_outline))
    }

    fn encrypted_pdf() -> Vec<u8> {
        let mut doc = sample_document(false);
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "Length" => 40,
            "P" => -4,
            "O" => Object::String(OWNER_ENTRY.to_vec(), StringFormat::Hexadecimal),
            "U" => Object::String(USER_ENTRY.to_vec(), StringFormat::Hexadecimal),
        });
        doc.trailer.set("Encrypt", encrypt_id);
        let file_id: Vec<u8> = (0..16).collect();
        doc.trailer.set(
            "ID",
            vec![
                Object::String(file_id.clone(), StringFormat::Hexadecimal),
                Object::String(file_id, StringFormat::Hexadecimal),
            ],
        );
        save(&mut doc)
    }

    fn sample_document(with_outline: bool) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let first = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        let second = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![first.into(), second.into()],
            "Count" => 2,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => pages_id };
        if with_outline {
            let outlines = doc.add_object(dictionary! { "Type" => "Outlines", "Count" => 0 });
            catalog.set("Outlines", outlines);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Quarterly report"),
            "Author" => Object::string_literal("Ada"),
        });
        doc.trailer.set("Info", info_id);
        doc
    }

    #[test]
    fn test_metadata_of_plain_document() {
        let preview = process_pdf(&sample_pdf(true), None).unwrap();
        assert_eq!(preview.access, PdfAccess::Opened);
        assert!(!preview.password_required);

        let metadata = preview.metadata.unwrap();
        assert_eq!(metadata.num_pages, 2);
        assert_eq!(metadata.title.as_deref(), Some("Quarterly report"));
        assert_eq!(metadata.author.as_deref(), Some("Ada"));
        assert!(metadata.has_outline);
        assert_eq!(metadata.pdf_version.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_outline_absent() {
        let metadata = process_pdf(&sample_pdf(false), None).unwrap().metadata.unwrap();
        assert!(!metadata.has_outline);
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = process_pdf(b"%PDF-1.4\nthis is not really a pdf", None).unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_decode_pdf_strings() {
        assert_eq!(decode_pdf_string(&[0xfe, 0xff, 0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_pdf_string(b"caf\xe9"), "café");
    }

    #[test]
    fn test_encrypted_document_needs_password() {
        let bytes = encrypted_pdf();

        let preview = process_pdf(&bytes, None).unwrap();
        assert_eq!(preview.access, PdfAccess::PasswordRequired);
        assert!(preview.password_required);
        assert!(preview.metadata.is_none());

        let preview = process_pdf(&bytes, Some("hunter2")).unwrap();
        assert!(matches!(preview.access, PdfAccess::PasswordIncorrect { .. }));
        assert!(preview.password_required);
        assert!(preview.metadata.is_none());

        let preview = process_pdf(&bytes, Some(USER_PASSWORD)).unwrap();
        assert_eq!(preview.access, PdfAccess::Opened);
        assert!(!preview.password_required);
        assert_eq!(preview.metadata.unwrap().num_pages, 2);
    }

    #[test]
    fn test_locked_preview_has_no_metadata() {
        let preview = PdfPreview::locked(PdfAccess::PasswordRequired, 10);
        assert!(preview.password_required);
        assert!(preview.metadata.is_none());
        let json = serde_json::to_value(&preview).unwrap();
        assert_eq!(json["access"]["state"], "passwordRequired");
        assert!(json.get("metadata").is_none());
    }
}
