//! Nearest-neighbour search over a semantic partition.
//!
//! A linear scan: every live entry's query is re-embedded on every call
//! and compared against the target vector. Nothing is cached between
//! calls, so cost grows with partition size times embedding latency.

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::Result;
use crate::cache::entry::CacheEntry;
use crate::cache::store::EntryStore;
use crate::cache::walker;
use crate::providers::EmbeddingProvider;
use crate::telemetry;

/// A semantic hit and the score that selected it.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    pub entry: CacheEntry,
    pub similarity: f32,
}

/// Finds the most similar live entry at or above a threshold.
pub struct SemanticMatcher<'a> {
    store: &'a EntryStore,
    embedder: &'a dyn EmbeddingProvider,
    threshold: f32,
}

impl<'a> SemanticMatcher<'a> {
    pub fn new(store: &'a EntryStore, embedder: &'a dyn EmbeddingProvider, threshold: f32) -> Self {
        Self {
            store,
            embedder,
            threshold,
        }
    }

    /// Scan every entry under `root` and return the best match for `target`.
    ///
    /// Expired entries met along the way are deleted. A candidate replaces
    /// the current best only with a strictly greater score, so among equal
    /// scores the first one listed wins. Returns `None` when nothing reaches
    /// the threshold or `root` does not exist.
    pub async fn find_best(&self, root: &Path, target: &[f32], now: i64) -> Result<Option<SemanticMatch>> {
        let started = Instant::now();
        let store = self.store;
        let embedder = self.embedder;
        let threshold = self.threshold;

        let best = walker::walk(root, None, move |best: Option<SemanticMatch>, path| async move {
            let Some(entry) = store.load(&path).await? else {
                return Ok(best);
            };
            if entry.is_expired(now) {
                store.expire(&path, &entry).await?;
                return Ok(best);
            }

            let candidate = embedder.embed(&entry.query).await?;
            let similarity = embedder.similarity(target, &candidate.values);
            if similarity < threshold || similarity.is_nan() {
                return Ok(best);
            }

            match best {
                Some(current) if similarity <= current.similarity => Ok(Some(current)),
                _ => {
                    debug!(query = %entry.query, similarity, "new best semantic candidate");
                    Ok(Some(SemanticMatch { entry, similarity }))
                }
            }
        })
        .await?;

        metrics::histogram!(telemetry::SCAN_DURATION_SECONDS, "operation" => "semantic")
            .record(started.elapsed().as_secs_f64());
        Ok(best)
    }
}
