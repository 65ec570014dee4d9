//! Persistent query → response cache.
//!
//! [`SemanticCache`] stores one JSON file per entry under
//! `<dir>/<segment>/<sign>/…`, keyed by a hash of the lower-cased query.
//! The filesystem is the only source of truth: no index is kept between
//! calls, and expired entries are deleted lazily by whichever read or scan
//! discovers them.
//!
//! # Partitions
//!
//! Each segment has two disjoint trees. [`Partition::Exact`] entries are
//! only reachable by exact key. [`Partition::Semantic`] entries are also
//! candidates for similarity search. An exact lookup never reads the
//! semantic tree and a similarity search never reads the exact tree.
//!
//! # Concurrency
//!
//! No locks. Concurrent writers to one key race (last write wins),
//! concurrent directory creation and expiry deletion are both tolerated.
//! A crash mid-write can leave a truncated entry, which later reads
//! report as [`MimirError::CorruptEntry`].

pub mod builder;
pub mod entry;
pub mod expiry;
pub mod key;
pub mod matcher;
pub mod store;
pub mod walker;

pub use builder::SemanticCacheBuilder;
pub use entry::{CacheEntry, Partition};
pub use key::{CacheKey, EntryLocation, KeyPathMapper};
pub use matcher::{SemanticMatch, SemanticMatcher};
pub use store::EntryStore;
pub use walker::SegmentWalker;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::providers::EmbeddingProvider;
use crate::telemetry;
use crate::{CacheConfig, MimirError, Result};

/// Per-write options for [`SemanticCache::set`].
///
/// ```rust
/// # use mimir::SetOptions;
/// # use std::time::Duration;
/// let opts = SetOptions::new().semantic().ttl(Duration::from_secs(5));
/// assert_eq!(opts.ttl_ms, Some(5000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetOptions {
    /// Partition to write into. Default: exact.
    pub partition: Partition,
    /// Lifetime override in ms; `None` uses the cache default.
    pub ttl_ms: Option<i64>,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write into the semantic partition.
    pub fn semantic(mut self) -> Self {
        self.partition = Partition::Semantic;
        self
    }

    pub fn partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = Some(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX));
        self
    }

    /// Raw TTL in milliseconds; negative means never expire.
    pub fn ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }

    pub fn never_expire(mut self) -> Self {
        self.ttl_ms = Some(expiry::NEVER_EXPIRES);
        self
    }
}

/// Outcome of a full partition scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Query text of every live entry, in listing order.
    pub existing: Vec<String>,
    /// Number of expired entries this scan deleted.
    pub pruned: usize,
}

/// File-backed response cache with optional semantic fallback.
pub struct SemanticCache {
    config: CacheConfig,
    mapper: KeyPathMapper,
    store: EntryStore,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl SemanticCache {
    /// Create a new builder for configuring the cache.
    pub fn builder() -> SemanticCacheBuilder {
        SemanticCacheBuilder::new()
    }

    /// Build an exact-only cache from `config`.
    pub fn from_config(config: CacheConfig) -> Result<Self> {
        SemanticCacheBuilder::new().config(config).build()
    }

    pub(crate) fn from_parts(config: CacheConfig, embedder: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self {
            mapper: KeyPathMapper::new(config.dir.clone()),
            store: EntryStore::new(),
            config,
            embedder,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Segment for callers without a namespace of their own.
    pub fn default_segment(&self) -> &str {
        &self.config.segment
    }

    /// Path mapping used by this cache.
    pub fn mapper(&self) -> &KeyPathMapper {
        &self.mapper
    }

    /// Create the base directory and initialize the embedding provider.
    pub async fn init(&self) -> Result<()> {
        let base = self.mapper.base();
        tokio::fs::create_dir_all(base)
            .await
            .map_err(|e| MimirError::io(base, e))?;
        if let Some(embedder) = &self.embedder {
            embedder.init().await?;
        }
        info!(
            dir = %base.display(),
            embedder = self.embedder.as_ref().map(|e| e.name()).unwrap_or("none"),
            "cache initialised"
        );
        Ok(())
    }

    /// Shut down the embedding provider. Stored entries are untouched.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(embedder) = &self.embedder {
            embedder.shutdown().await?;
        }
        Ok(())
    }

    /// Look up `query`.
    ///
    /// Always tries the exact partition first. With
    /// [`Partition::Semantic`], a miss falls back to the most similar live
    /// entry in the semantic partition. `None` on miss or empty query.
    pub async fn get(&self, segment: &str, query: &str, partition: Partition) -> Result<Option<CacheEntry>> {
        key::validate_segment(segment)?;
        let Some(loc) = self.mapper.locate(segment, Partition::Exact, query) else {
            warn!(segment, "'query' is required to get its value");
            return Ok(None);
        };

        if let Some(entry) = self.store.read(&loc.path, expiry::now_millis()).await? {
            debug!(segment, key = %loc.key, "exact hit");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "lookup" => "exact").increment(1);
            return Ok(Some(entry));
        }

        if !partition.is_semantic() {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "lookup" => "exact").increment(1);
            return Ok(None);
        }

        match self.find_similar(segment, query).await? {
            Some(found) => {
                debug!(segment, similarity = found.similarity, matched = %found.entry.query, "semantic hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "lookup" => "semantic").increment(1);
                Ok(Some(found.entry))
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "lookup" => "semantic")
                    .increment(1);
                Ok(None)
            }
        }
    }

    /// Most similar live entry in the semantic partition, with its score.
    ///
    /// Skips the exact partition entirely.
    pub async fn find_similar(&self, segment: &str, query: &str) -> Result<Option<SemanticMatch>> {
        key::validate_segment(segment)?;
        if query.is_empty() {
            warn!(segment, "'query' is required for a similarity search");
            return Ok(None);
        }
        let embedder = self.embedder.as_deref().ok_or(MimirError::NoProvider)?;

        let target = embedder.embed(query).await?;
        let root = self.mapper.partition_root(segment, Partition::Semantic);
        SemanticMatcher::new(&self.store, embedder, self.config.similarity_threshold)
            .find_best(&root, &target.values, expiry::now_millis())
            .await
    }

    /// Store `response` for `query`, replacing any previous entry.
    ///
    /// Returns the written entry, or `None` (and writes nothing) when the
    /// query is empty or the response is null or an empty string.
    pub async fn set<R: Serialize>(
        &self,
        segment: &str,
        query: &str,
        response: R,
        options: SetOptions,
    ) -> Result<Option<CacheEntry>> {
        key::validate_segment(segment)?;
        let Some(loc) = self.mapper.locate(segment, options.partition, query) else {
            warn!(segment, "'query' is required to set its value");
            return Ok(None);
        };
        let response = serde_json::to_value(response)?;
        if is_missing(&response) {
            warn!(segment, "'response' is required to store the query");
            return Ok(None);
        }

        let entry = CacheEntry {
            query: query.to_string(),
            response,
            stored: expiry::now_millis(),
            ttl: options.ttl_ms.unwrap_or(self.config.ttl_ms),
            is_semantic: options.partition.is_semantic(),
        };
        let entry = self.store.write(&loc.path, entry).await?;
        debug!(segment, key = %loc.key, partition = %options.partition, "entry written");
        Ok(Some(entry))
    }

    /// Whether an entry file exists for `query` in `partition`.
    ///
    /// Does not check expiry, consult the other partition, or run a
    /// similarity search.
    pub async fn has(&self, segment: &str, query: &str, partition: Partition) -> Result<bool> {
        key::validate_segment(segment)?;
        let Some(loc) = self.mapper.locate(segment, partition, query) else {
            warn!(segment, "'query' is required to locate it");
            return Ok(false);
        };
        self.store.exists(&loc.path).await
    }

    /// Delete the entry for `query` from `partition`.
    ///
    /// `true` if a file was deleted; `false` if there was none or the query
    /// is empty.
    pub async fn remove(&self, segment: &str, query: &str, partition: Partition) -> Result<bool> {
        key::validate_segment(segment)?;
        let Some(loc) = self.mapper.locate(segment, partition, query) else {
            warn!(segment, "'query' is required to delete it");
            return Ok(false);
        };
        let removed = self.store.remove(&loc.path).await?;
        debug!(segment, key = %loc.key, removed, "remove");
        Ok(removed)
    }

    /// Alias for [`remove`](Self::remove).
    pub async fn del(&self, segment: &str, query: &str, partition: Partition) -> Result<bool> {
        self.remove(segment, query, partition).await
    }

    /// Alias for [`remove`](Self::remove).
    pub async fn delete(&self, segment: &str, query: &str, partition: Partition) -> Result<bool> {
        self.remove(segment, query, partition).await
    }

    /// Walk `partition`, deleting expired entries and collecting live queries.
    pub async fn scan(&self, segment: &str, partition: Partition) -> Result<ScanSummary> {
        key::validate_segment(segment)?;
        let started = Instant::now();
        let root = self.mapper.partition_root(segment, partition);
        let store = &self.store;
        let now = expiry::now_millis();

        let summary = walker::walk(&root, ScanSummary::default(), move |mut summary: ScanSummary, path| async move {
            match store.load(&path).await? {
                Some(entry) if entry.is_expired(now) => {
                    if store.expire(&path, &entry).await? {
                        summary.pruned += 1;
                    }
                }
                Some(entry) => summary.existing.push(entry.query),
                None => {}
            }
            Ok(summary)
        })
        .await?;

        metrics::histogram!(telemetry::SCAN_DURATION_SECONDS, "operation" => "scan")
            .record(started.elapsed().as_secs_f64());
        debug!(segment, %partition, live = summary.existing.len(), pruned = summary.pruned, "scan complete");
        Ok(summary)
    }

    /// Query text of every live entry in `partition`. Deletes expired ones.
    pub async fn queries(&self, segment: &str, partition: Partition) -> Result<Vec<String>> {
        Ok(self.scan(segment, partition).await?.existing)
    }

    /// Delete expired entries in `partition`; returns how many were deleted.
    pub async fn prune(&self, segment: &str, partition: Partition) -> Result<usize> {
        Ok(self.scan(segment, partition).await?.pruned)
    }

    /// Hex keys of every entry file in `partition`, expired or not.
    pub async fn keys(&self, segment: &str, partition: Partition) -> Result<Vec<String>> {
        key::validate_segment(segment)?;
        let root = self.mapper.partition_root(segment, partition);
        walker::walk(&root, Vec::new(), |mut keys: Vec<String>, path| async move {
            keys.extend(key::key_from_path(&path));
            Ok(keys)
        })
        .await
    }

    /// Delete a whole segment, both partitions. `false` if it did not exist.
    pub async fn clear(&self, segment: &str) -> Result<bool> {
        key::validate_segment(segment)?;
        let root = self.mapper.segment_root(segment);
        let cleared = self.store.remove_tree(&root).await?;
        if cleared {
            info!(segment, "segment cleared");
        }
        Ok(cleared)
    }
}

/// A response that counts as "not given".
fn is_missing(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}
