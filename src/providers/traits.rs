//! Provider trait for the embedding collaborator.
//!
//! The semantic cache treats embeddings as opaque: it asks a provider for a
//! vector per query text and for a scalar similarity between two vectors.
//! Model identity, dimensionality and any caching of the embedding
//! computation itself are the provider's business.
//!
//! # Lifecycle
//!
//! Providers are constructed explicitly and injected into the cache through
//! [`SemanticCacheBuilder::embedder()`](crate::SemanticCacheBuilder::embedder).
//! [`SemanticCache::init()`](crate::SemanticCache::init) calls
//! [`EmbeddingProvider::init`] and
//! [`SemanticCache::shutdown()`](crate::SemanticCache::shutdown) calls
//! [`EmbeddingProvider::shutdown`]. Providers with nothing to load can keep
//! the default no-op implementations.
//!
//! # Example
//!
//! ```ignore
//! struct Remote { client: Client }
//!
//! #[async_trait]
//! impl EmbeddingProvider for Remote {
//!     fn name(&self) -> &str { "remote" }
//!
//!     async fn embed(&self, text: &str) -> Result<Embedding> {
//!         let values = self.client.embed(text).await?;
//!         Ok(Embedding::new(values, "remote-model"))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::providers::similarity::cosine_similarity;
use crate::types::Embedding;

/// Provider for text embeddings and vector similarity.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Load models or open connections before first use.
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Scalar similarity between two vectors, higher is more similar.
    ///
    /// Defaults to cosine similarity, range [-1, 1].
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }

    /// Release whatever [`init`](Self::init) acquired.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
