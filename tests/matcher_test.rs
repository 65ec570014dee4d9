//! Tests for similarity search over the semantic partition.

mod common;

use std::sync::Arc;

use serde_json::json;

use common::TableEmbedder;
use mimir::cache::{EntryStore, SemanticMatcher};
use mimir::{SemanticCache, SetOptions};

const SEG: &str = "default";

fn cache(dir: &std::path::Path, embedder: Arc<TableEmbedder>, threshold: f32) -> SemanticCache {
    SemanticCache::builder()
        .dir(dir)
        .similarity_threshold(threshold)
        .embedder(embedder)
        .build()
        .unwrap()
}

#[tokio::test]
async fn candidates_below_threshold_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[("lookup", &[1.0, 0.0]), ("close-ish", &[0.8, 0.6])]));
    let cache = cache(dir.path(), embedder, 0.9);
    cache.set(SEG, "close-ish", "r", SetOptions::new().semantic()).await.unwrap();

    assert!(cache.find_similar(SEG, "lookup").await.unwrap().is_none());
}

#[tokio::test]
async fn score_equal_to_threshold_is_a_hit() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[("lookup", &[1.0, 0.0]), ("same", &[2.0, 0.0])]));
    let cache = cache(dir.path(), embedder, 1.0);
    cache.set(SEG, "same", "r", SetOptions::new().semantic()).await.unwrap();

    let found = cache.find_similar(SEG, "lookup").await.unwrap().unwrap();
    assert_eq!(found.similarity, 1.0);
}

#[tokio::test]
async fn highest_score_wins() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[
        ("lookup", &[1.0, 0.0]),
        ("good", &[0.95, 0.31]),
        ("best", &[3.0, 0.0]),
        ("bad", &[0.0, 1.0]),
    ]));
    let cache = cache(dir.path(), embedder, 0.9);
    for (query, response) in [("good", 1), ("best", 2), ("bad", 3)] {
        cache.set(SEG, query, response, SetOptions::new().semantic()).await.unwrap();
    }

    let found = cache.find_similar(SEG, "lookup").await.unwrap().unwrap();
    assert_eq!(found.entry.query, "best");
    assert_eq!(found.entry.response, json!(2));
}

#[tokio::test]
async fn ties_go_to_first_listed_entry() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[
        ("lookup", &[1.0, 0.0]),
        ("twin-a", &[1.0, 0.0]),
        ("twin-b", &[1.0, 0.0]),
    ]));
    let cache = cache(dir.path(), embedder.clone(), 0.9);
    cache.set(SEG, "twin-a", "a", SetOptions::new().semantic()).await.unwrap();
    cache.set(SEG, "twin-b", "b", SetOptions::new().semantic()).await.unwrap();

    let found = cache.find_similar(SEG, "lookup").await.unwrap().unwrap();

    // calls()[0] is the lookup text; the next one is the first entry the walk listed.
    let calls = embedder.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(found.entry.query, calls[1]);
}

#[tokio::test]
async fn every_lookup_re_embeds_every_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[("lookup", &[1.0, 0.0]), ("x", &[1.0, 0.0]), ("y", &[0.0, 1.0])]));
    let cache = cache(dir.path(), embedder.clone(), 0.9);
    cache.set(SEG, "x", 1, SetOptions::new().semantic()).await.unwrap();
    cache.set(SEG, "y", 2, SetOptions::new().semantic()).await.unwrap();

    cache.find_similar(SEG, "lookup").await.unwrap();
    cache.find_similar(SEG, "lookup").await.unwrap();
    assert_eq!(embedder.calls().len(), 6);
}

#[tokio::test]
async fn expired_candidates_are_deleted_not_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[("lookup", &[1.0, 0.0]), ("stale", &[1.0, 0.0])]));
    let cache = cache(dir.path(), embedder.clone(), 0.9);
    cache.set(SEG, "stale", 1, SetOptions::new().semantic().ttl_ms(0)).await.unwrap();

    assert!(cache.find_similar(SEG, "lookup").await.unwrap().is_none());
    assert_eq!(embedder.calls(), vec!["lookup"]);
    assert!(cache.keys(SEG, mimir::Partition::Semantic).await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_vector_scores_zero_and_passes_low_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[("lookup", &[1.0, 0.0])]));
    let cache = cache(dir.path(), embedder, -1.0);
    cache.set(SEG, "unknown text", 1, SetOptions::new().semantic()).await.unwrap();

    let found = cache.find_similar(SEG, "lookup").await.unwrap().unwrap();
    assert_eq!(found.similarity, 0.0);
}

#[tokio::test]
async fn matcher_on_missing_root_finds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = TableEmbedder::new(&[]);
    let store = EntryStore::new();

    let found = SemanticMatcher::new(&store, &embedder, 0.0)
        .find_best(&dir.path().join("absent"), &[1.0, 0.0], 0)
        .await
        .unwrap();
    assert!(found.is_none());
    assert!(embedder.calls().is_empty());
}
