//! Public types shared between the cache and embedding providers.

mod embedding;

pub use embedding::Embedding;
