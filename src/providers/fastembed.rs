//! Local embeddings via fastembed-rs.
//!
//! The model is loaded in [`EmbeddingProvider::init`] and dropped in
//! [`EmbeddingProvider::shutdown`]. Inference runs on the blocking pool.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use crate::error::{MimirError, Result};
use crate::providers::traits::EmbeddingProvider;
use crate::types::Embedding;

/// Supported local embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocalEmbeddingModel {
    /// all-MiniLM-L6-v2 (384 dims, fast, good quality).
    #[default]
    AllMiniLmL6V2,
    /// all-MiniLM-L12-v2 (384 dims, slightly better).
    AllMiniLmL12V2,
    /// BGE-small-en (384 dims, strong retrieval).
    BgeSmallEn,
    /// BGE-base-en (768 dims, higher quality).
    BgeBaseEn,
}

impl LocalEmbeddingModel {
    /// Get the model name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            Self::AllMiniLmL12V2 => "all-MiniLM-L12-v2",
            Self::BgeSmallEn => "BGE-small-en",
            Self::BgeBaseEn => "BGE-base-en",
        }
    }

    /// Get the embedding dimensions.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::AllMiniLmL6V2 | Self::AllMiniLmL12V2 | Self::BgeSmallEn => 384,
            Self::BgeBaseEn => 768,
        }
    }
}

impl From<LocalEmbeddingModel> for fastembed::EmbeddingModel {
    fn from(model: LocalEmbeddingModel) -> Self {
        match model {
            LocalEmbeddingModel::AllMiniLmL6V2 => fastembed::EmbeddingModel::AllMiniLML6V2,
            LocalEmbeddingModel::AllMiniLmL12V2 => fastembed::EmbeddingModel::AllMiniLML12V2,
            LocalEmbeddingModel::BgeSmallEn => fastembed::EmbeddingModel::BGESmallENV15,
            LocalEmbeddingModel::BgeBaseEn => fastembed::EmbeddingModel::BGEBaseENV15,
        }
    }
}

/// Information about an embedding model.
#[derive(Debug, Clone)]
pub struct EmbeddingModelInfo {
    /// Model name.
    pub name: String,
    /// Embedding dimensions.
    pub dimensions: usize,
}

impl From<LocalEmbeddingModel> for EmbeddingModelInfo {
    fn from(model: LocalEmbeddingModel) -> Self {
        Self {
            name: model.name().to_string(),
            dimensions: model.dimensions(),
        }
    }
}

/// Local embedding provider using fastembed-rs.
pub struct FastEmbedProvider {
    model: LocalEmbeddingModel,
    model_info: EmbeddingModelInfo,
    cache_dir: PathBuf,
    loaded: Arc<Mutex<Option<fastembed::TextEmbedding>>>,
}

impl FastEmbedProvider {
    /// Create an unloaded provider for the specified model.
    ///
    /// Model files are downloaded to `MIMIR_MODELS_DIR`, or the user cache
    /// directory, on [`init`](EmbeddingProvider::init).
    pub fn new(model: LocalEmbeddingModel) -> Self {
        let cache_dir = std::env::var("MIMIR_MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::cache_dir()
                    .unwrap_or_else(|| PathBuf::from(".cache"))
                    .join("mimir")
                    .join("models")
            });
        Self::with_cache_dir(model, cache_dir)
    }

    /// Create an unloaded provider that keeps model files in `cache_dir`.
    pub fn with_cache_dir(model: LocalEmbeddingModel, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            model,
            model_info: model.into(),
            cache_dir: cache_dir.into(),
            loaded: Arc::new(Mutex::new(None)),
        }
    }

    /// Get model information.
    pub fn model_info(&self) -> &EmbeddingModelInfo {
        &self.model_info
    }

    /// Whether [`init`](EmbeddingProvider::init) has loaded the model.
    pub fn is_loaded(&self) -> bool {
        self.loaded.lock().map(|m| m.is_some()).unwrap_or(false)
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &str {
        "fastembed"
    }

    async fn init(&self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }

        let options = fastembed::InitOptions::new(self.model.into())
            .with_show_download_progress(false)
            .with_cache_dir(self.cache_dir.clone());

        let instance = tokio::task::spawn_blocking(move || fastembed::TextEmbedding::try_new(options))
            .await
            .map_err(|e| MimirError::Embedding(format!("model loader panicked: {e}")))?
            .map_err(|e| MimirError::Embedding(format!("Failed to load embedding model: {e}")))?;

        let mut slot = self
            .loaded
            .lock()
            .map_err(|e| MimirError::Embedding(format!("Failed to acquire model lock: {e}")))?;
        *slot = Some(instance);
        info!(model = self.model.name(), "embedding model loaded");
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let loaded = Arc::clone(&self.loaded);
        let text = text.to_string();

        let values = tokio::task::spawn_blocking(move || {
            let mut slot = loaded
                .lock()
                .map_err(|e| MimirError::Embedding(format!("Failed to acquire model lock: {e}")))?;
            let model = slot.as_mut().ok_or_else(|| {
                MimirError::Embedding("embedding model not loaded; call init() first".to_string())
            })?;
            let vectors = model
                .embed(vec![text], None)
                .map_err(|e| MimirError::Embedding(format!("Embedding failed: {e}")))?;
            vectors
                .into_iter()
                .next()
                .ok_or_else(|| MimirError::Embedding("No embedding returned".to_string()))
        })
        .await
        .map_err(|e| MimirError::Embedding(format!("embedding task panicked: {e}")))??;

        Ok(Embedding {
            values,
            model: self.model_info.name.clone(),
            dimensions: self.model_info.dimensions,
        })
    }

    async fn shutdown(&self) -> Result<()> {
        let mut slot = self
            .loaded
            .lock()
            .map_err(|e| MimirError::Embedding(format!("Failed to acquire model lock: {e}")))?;
        if slot.take().is_some() {
            info!(model = self.model.name(), "embedding model released");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_starts_unloaded() {
        let provider =
            FastEmbedProvider::with_cache_dir(LocalEmbeddingModel::BgeSmallEn, "/tmp/unused");
        assert!(!provider.is_loaded());
        assert_eq!(provider.model_info().dimensions, 384);
    }

    #[tokio::test]
    async fn embed_before_init_is_an_error() {
        let provider =
            FastEmbedProvider::with_cache_dir(LocalEmbeddingModel::AllMiniLmL6V2, "/tmp/unused");
        let err = provider.embed("hello").await.unwrap_err();
        assert!(err.to_string().contains("init()"));
    }

    #[tokio::test]
    async fn shutdown_without_init_is_noop() {
        let provider =
            FastEmbedProvider::with_cache_dir(LocalEmbeddingModel::AllMiniLmL6V2, "/tmp/unused");
        assert!(provider.shutdown().await.is_ok());
    }
}
