//! Embedding vectors produced by an [`EmbeddingProvider`](crate::providers::EmbeddingProvider).

use serde::{Deserialize, Serialize};

/// A dense vector representation of a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
    pub model: String,
    pub dimensions: usize,
}

impl Embedding {
    /// Build an embedding, deriving `dimensions` from the vector length.
    pub fn new(values: Vec<f32>, model: impl Into<String>) -> Self {
        let dimensions = values.len();
        Self {
            values,
            model: model.into(),
            dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_dimensions() {
        let e = Embedding::new(vec![0.1, 0.2, 0.3], "m");
        assert_eq!(e.dimensions, 3);
        assert_eq!(e.model, "m");
    }
}
