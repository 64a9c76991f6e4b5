//! Envelopes for media that are described rather than rendered

pub mod excalidraw;
pub mod html;
pub mod image;
pub mod pdf;
pub mod table;

pub use excalidraw::{ExcalidrawMetadata, ExcalidrawPreview, looks_like_excalidraw, process_excalidraw};
pub use html::{HtmlMetadata, HtmlPreview, html_title, process_html};
pub use image::{ImageFormat, ImageMetadata, ImagePreview, process_image, sniff_image_format};
pub use pdf::{PdfAccess, PdfError, PdfMetadata, PdfPreview, process_pdf};
pub use table::{CsvMetadata, CsvPreview, delimiter_for, process_csv};
