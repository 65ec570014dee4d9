//! Builder for configuring cache instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::SemanticCache;
use crate::providers::EmbeddingProvider;
use crate::{CacheConfig, Result};

/// Builder for configuring cache instances.
///
/// ```rust
/// # use mimir::SemanticCache;
/// # use std::time::Duration;
/// let cache = SemanticCache::builder()
///     .dir("/tmp/mimir-doc")
///     .segment("answers")
///     .ttl(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// assert_eq!(cache.default_segment(), "answers");
/// ```
#[derive(Default)]
pub struct SemanticCacheBuilder {
    config: CacheConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl SemanticCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete configuration, e.g. one loaded from TOML.
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base cache directory.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config = self.config.dir(dir);
        self
    }

    /// Set the default segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.config = self.config.segment(segment);
        self
    }

    /// Set the default entry lifetime.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config = self.config.ttl(ttl);
        self
    }

    /// Entries written with the default TTL never expire.
    pub fn never_expire(mut self) -> Self {
        self.config = self.config.never_expire();
        self
    }

    /// Set the minimum similarity for a semantic hit (default: 0.9).
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config = self.config.similarity_threshold(threshold);
        self
    }

    /// Inject the embedding provider used by semantic lookups.
    ///
    /// Without one, exact lookups work and semantic lookups fail with
    /// [`MimirError::NoProvider`](crate::MimirError::NoProvider).
    pub fn embedder(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(provider);
        self
    }

    /// Validate the configuration and build the cache.
    ///
    /// No I/O happens here; call [`SemanticCache::init`] before use.
    pub fn build(self) -> Result<SemanticCache> {
        self.config.validate()?;
        Ok(SemanticCache::from_parts(self.config, self.embedder))
    }
}
