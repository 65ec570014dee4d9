//! Deterministic embedding providers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use mimir::{Embedding, EmbeddingProvider, Result, SemanticCache};

/// Counts occurrences of a fixed vocabulary, plus a small bias dimension
/// so no text maps to the zero vector.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    pub embed_calls: AtomicUsize,
    pub init_calls: AtomicUsize,
    pub shutdown_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            vocabulary: vec!["swallow", "turtle", "france", "water"],
            embed_calls: AtomicUsize::new(0),
            init_calls: AtomicUsize::new(0),
            shutdown_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn init(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        let mut values: Vec<f32> = self
            .vocabulary
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect();
        values.push(0.1);
        Ok(Embedding::new(values, "keyword"))
    }

    async fn shutdown(&self) -> Result<()> {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Returns a fixed vector per text (zero vector for unknown text) and
/// records which texts it was asked to embed, in order.
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    pub calls: Mutex<Vec<String>>,
}

impl TableEmbedder {
    pub fn new(rows: &[(&str, &[f32])]) -> Self {
        Self {
            table: rows
                .iter()
                .map(|(text, v)| (text.to_string(), v.to_vec()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    fn name(&self) -> &str {
        "table"
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.calls.lock().unwrap().push(text.to_string());
        let values = self.table.get(text).cloned().unwrap_or_else(|| vec![0.0, 0.0]);
        Ok(Embedding::new(values, "table"))
    }
}

/// Cache rooted in `dir` with the given provider.
pub fn cache_with(dir: &Path, embedder: Arc<dyn EmbeddingProvider>) -> SemanticCache {
    SemanticCache::builder()
        .dir(dir)
        .similarity_threshold(0.9)
        .embedder(embedder)
        .build()
        .unwrap()
}
