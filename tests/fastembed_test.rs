//! Tests for fastembed provider.

#![cfg(feature = "local-inference")]

use mimir::providers::LocalEmbeddingModel;

#[test]
fn test_local_embedding_model_properties() {
    let model = LocalEmbeddingModel::AllMiniLmL6V2;
    assert_eq!(model.name(), "all-MiniLM-L6-v2");
    assert_eq!(model.dimensions(), 384);

    let model = LocalEmbeddingModel::BgeBaseEn;
    assert_eq!(model.name(), "BGE-base-en");
    assert_eq!(model.dimensions(), 768);
}

// Note: Tests that actually load models need network access to download
// them and are slow, so none live here. The not-loaded error is covered by
// the unit tests next to the provider.
