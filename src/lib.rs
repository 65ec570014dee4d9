//! Mimir - persistent response cache with semantic fallback
//!
//! This crate caches expensive query → response pairs (answers to natural
//! language questions, LLM completions, ...) on disk, one JSON file per
//! entry. Lookups are by exact content hash of the lower-cased query; an
//! optional fallback returns the cached response of the most *similar*
//! query when no exact match exists, using an injected
//! [`EmbeddingProvider`].
//!
//! Entries live until their TTL elapses or they are removed. There is no
//! capacity-based eviction.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mimir::{Partition, SemanticCache, SetOptions};
//! # use mimir::{EmbeddingProvider, Embedding};
//! # struct MyEmbedder;
//! # #[async_trait::async_trait]
//! # impl EmbeddingProvider for MyEmbedder {
//! #     fn name(&self) -> &str { "mine" }
//! #     async fn embed(&self, text: &str) -> mimir::Result<Embedding> {
//! #         Ok(Embedding::new(vec![text.len() as f32], "mine"))
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let cache = SemanticCache::builder()
//!         .dir("./cache")
//!         .similarity_threshold(0.9)
//!         .embedder(Arc::new(MyEmbedder))
//!         .build()?;
//!     cache.init().await?;
//!
//!     let seg = cache.default_segment().to_string();
//!     cache
//!         .set(&seg, "What is the speed of a swallow?", 500, SetOptions::new().semantic())
//!         .await?;
//!
//!     if let Some(hit) = cache.get(&seg, "How fast does the swallow fly?", Partition::Semantic).await? {
//!         println!("{}", hit.response);
//!     }
//!
//!     cache.shutdown().await
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{
    CacheEntry, CacheKey, Partition, ScanSummary, SemanticCache, SemanticCacheBuilder,
    SemanticMatch, SetOptions,
};
pub use config::CacheConfig;
pub use error::{MimirError, Result};
pub use providers::EmbeddingProvider;
pub use types::Embedding;

#[cfg(feature = "local-inference")]
pub use providers::{FastEmbedProvider, LocalEmbeddingModel};
