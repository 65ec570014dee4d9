//! Embedding providers consumed by the semantic lookup path.
//!
//! The cache never computes embeddings itself: it is handed an
//! [`EmbeddingProvider`] at construction and only consumes its vectors
//! and similarity scores.

#[cfg(feature = "local-inference")]
pub mod fastembed;
pub mod similarity;
pub mod traits;

#[cfg(feature = "local-inference")]
pub use fastembed::{EmbeddingModelInfo, FastEmbedProvider, LocalEmbeddingModel};
pub use similarity::cosine_similarity;
pub use traits::EmbeddingProvider;
