//! Content classification and previews
//!
//! This module turns opaque relic content into one typed preview:
//! - [`ContentRouter`] picks a processor from the declared type, the
//!   language hint and the content itself
//! - [`ProcessedPreview`] is the serialisable result
//! - [`RelicPreviewProvider`] fetches relics from a [`RelicSource`] and
//!   caches their previews

mod error;
mod provider;
mod router;
mod types;

pub use error::{PreviewError, Result};
pub use provider::{FetchedRelic, LocalFileSource, RelicPreviewProvider, RelicSource};
pub use router::{classify, ContentRouter};
pub use types::{ContentDescriptor, DiffMetadata, DiffPreview, ProcessedPreview};
