//! Relic preview provider implementation

use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use moka::sync::Cache;
use tokio_util::sync::CancellationToken;

use super::error::{PreviewError, Result};
use super::router::ContentRouter;
use super::types::{ContentDescriptor, ProcessedPreview};
use crate::config::PreviewSettings;
use crate::registry::Registry;

/// Raw content of one relic as delivered by a [`RelicSource`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedRelic {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub language_hint: Option<String>,
}

impl FetchedRelic {
    fn descriptor(&self) -> ContentDescriptor<'_> {
        ContentDescriptor::new(&self.bytes)
            .with_content_type(self.content_type.as_deref())
            .with_language_hint(self.language_hint.as_deref())
    }
}

/// Where relic content comes from
pub trait RelicSource: Send + Sync {
    /// Fetch the content of relic `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the relic does not exist or cannot be read.
    fn fetch(&self, id: &str) -> io::Result<FetchedRelic>;
}

/// Reads relics from files below a root directory
///
/// The relic id is the file's path relative to the root.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    root: PathBuf,
    content_type: Option<String>,
}

impl LocalFileSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            content_type: None,
        }
    }

    /// Declare every fetched relic as `content_type` instead of leaving it to sniffing
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> io::Result<PathBuf> {
        let relative = Path::new(id);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if id.is_empty() || escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid relic id: {id}"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl RelicSource for LocalFileSource {
    fn fetch(&self, id: &str) -> io::Result<FetchedRelic> {
        let path = self.resolve(id)?;
        let bytes = std::fs::read(&path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read relic");
        Ok(FetchedRelic {
            bytes,
            content_type: self.content_type.clone(),
            language_hint: None,
        })
    }
}

/// Relic preview provider with caching
///
/// Previews are cached by relic id, so repeated requests for the same relic
/// neither refetch nor reclassify until the entry expires or is invalidated.
pub struct RelicPreviewProvider<S> {
    source: S,
    router: ContentRouter,
    cache: Cache<String, ProcessedPreview>,
}

impl<S: RelicSource> RelicPreviewProvider<S> {
    /// Create a provider using the cache limits from `settings`
    #[must_use]
    pub fn new(source: S, settings: &PreviewSettings) -> Self {
        Self::with_router(
            source,
            ContentRouter::new(Registry::builtin(), settings),
            Duration::from_secs(settings.cache.ttl_secs),
            settings.cache.max_capacity,
        )
    }

    /// Create a provider with an explicit router and cache configuration
    ///
    /// # Arguments
    ///
    /// * `source` - Where relic content is fetched from
    /// * `router` - Router used to classify fetched content
    /// * `ttl` - Time-to-live for cache entries
    /// * `max_capacity` - Maximum number of cached previews
    #[must_use]
    pub fn with_router(source: S, router: ContentRouter, ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();

        Self {
            source,
            router,
            cache,
        }
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub const fn router(&self) -> &ContentRouter {
        &self.router
    }

    /// Preview relic `id`, serving a cached result when available
    ///
    /// # Errors
    /// * `PreviewError::Fetch` if the source cannot deliver the relic.
    /// * Any classification error; failures are not cached.
    pub fn preview(&self, id: &str) -> Result<ProcessedPreview> {
        self.preview_cancellable(id, &CancellationToken::new())
    }

    /// Preview relic `id`, aborting when `cancel` fires
    ///
    /// # Errors
    /// As [`RelicPreviewProvider::preview`], plus `PreviewError::Cancelled`.
    pub fn preview_cancellable(&self, id: &str, cancel: &CancellationToken) -> Result<ProcessedPreview> {
        if let Some(cached) = self.cache.get(id) {
            tracing::debug!(id, "preview cache hit");
            return Ok(cached);
        }

        let relic = self.source.fetch(id).map_err(|e| PreviewError::Fetch {
            id: id.to_string(),
            message: e.to_string(),
        })?;
        let preview = self.router.classify_cancellable(&relic.descriptor(), cancel)?;

        self.cache.insert(id.to_string(), preview.clone());
        Ok(preview)
    }

    /// Drop the cached preview of relic `id`
    pub fn invalidate(&self, id: &str) {
        self.cache.invalidate(id);
    }

    /// Clear the preview cache
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache statistics as `(entry_count, weighted_size)`
    #[must_use]
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.entry_count(), self.cache.weighted_size())
    }
}
